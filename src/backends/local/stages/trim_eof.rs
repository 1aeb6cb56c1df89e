// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::engine::{StageInput, Transform};
use crate::errors::{ErrorKind, OperationError};

/// Strips trailing line endings from a text value.
///
/// A single trailing `\r` or `\n` is removed silently. Two or more such
/// characters, a `\r\n` pair included, is a recoverable failure carrying the
/// trimmed text. A value that is not text is a recoverable failure carrying
/// the value as is.
pub struct TrimEof;

impl TrimEof {
    pub const NAME: &'static str = "trim_eof";

    pub fn apply(input: &StageInput<'_>) -> Result<Value, OperationError> {
        let Some(text) = input.value.as_str() else {
            return Err(OperationError::new(
                ErrorKind::InvalidInput,
                format!(
                    "Warning: stage \"{}\" expects a string, but received {}.",
                    Self::NAME,
                    type_name(input.value)
                ),
            )
            .with_recovered(input.value.clone()));
        };

        let (trimmed, endings) = trim_line_endings(text);
        if endings >= 2 {
            return Err(OperationError::recoverable(
                "Warning: extra \"\\r\" or \"\\n\" have been trimmed from the EOF.",
                Value::String(trimmed.to_string()),
            ));
        }
        Ok(Value::String(trimmed.to_string()))
    }

    pub fn transform() -> Transform {
        Transform::new(Self::NAME, Self::apply)
    }
}

/// Trimmed text and the number of `\r`/`\n` characters removed.
fn trim_line_endings(text: &str) -> (&str, usize) {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    (trimmed, text.len() - trimmed.len())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
