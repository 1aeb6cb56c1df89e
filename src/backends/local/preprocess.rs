// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::config::consts::DEFAULT_ENCODING;
use crate::engine::Preprocessor;
use crate::errors::{ErrorKind, OperationError};

/// Appends the default text encoding to a `[path]` argument list.
///
/// An explicit encoding is left alone. An empty argument list is rejected,
/// which makes the run fall back to the arguments as given.
pub fn default_encoding() -> Preprocessor {
    Preprocessor::new("default_encoding", |args| match args {
        [] => Err(OperationError::new(
            ErrorKind::InvalidInput,
            "expected a file path argument",
        )),
        [path] => Ok(vec![path.clone(), Value::String(DEFAULT_ENCODING.to_string())]),
        _ => Ok(args.to_vec()),
    })
}
