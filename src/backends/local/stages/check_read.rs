// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::engine::{StageInput, Transform};
use crate::errors::{ErrorKind, OperationError};

/// First stage after a file read: turns a missing file into a readable,
/// unrecoverable failure and passes any other read failure through as fatal.
pub struct CheckRead;

impl CheckRead {
    pub const NAME: &'static str = "check_read";

    pub fn apply(input: &StageInput<'_>) -> Result<Value, OperationError> {
        let Some(error) = input.error else {
            return Ok(input.value.clone());
        };

        if error.kind == ErrorKind::NotFound {
            let path = input.args.first().and_then(Value::as_str).unwrap_or("<unknown>");
            return Err(OperationError::not_found(format!(
                "Failed to find file \"{}\".",
                path
            )));
        }

        Err(OperationError::new(error.kind, error.message.clone()))
    }

    pub fn transform() -> Transform {
        Transform::new(Self::NAME, Self::apply)
    }
}
