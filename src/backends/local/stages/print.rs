// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::Output;
use crate::engine::{StageInput, Transform};
use crate::errors::OperationError;

/// Writes the current value as one line and passes it on unchanged.
///
/// Text is written as is; any other value is written as JSON.
pub struct Print {
    output: Output,
}

impl Print {
    pub const NAME: &'static str = "print";

    pub fn new(output: Output) -> Self {
        Self { output }
    }

    pub fn apply(&self, input: &StageInput<'_>) -> Result<Value, OperationError> {
        let line = match input.value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        self.output
            .write_line(&line)
            .map_err(|e| OperationError::from_io(&e, Self::NAME))?;
        Ok(input.value.clone())
    }

    pub fn transform(self) -> Transform {
        Transform::new(Self::NAME, move |input| self.apply(input))
    }
}
