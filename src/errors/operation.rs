// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors that travel through a pipeline run.
//!
//! An `OperationError` is produced either by the wrapped operation or by a
//! stage. Whether a stage failure is recoverable is decided by the presence of
//! a `recovered` substitute value, so the same type covers the operation
//! failure, the recoverable stage failure and the fatal stage failure.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io;
use thiserror::Error;

/// Coarse classification of an `OperationError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    InvalidInput,
    InvalidData,
    Io,
    Stage,
    Misuse,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidData => "invalid_data",
            ErrorKind::Io => "io",
            ErrorKind::Stage => "stage",
            ErrorKind::Misuse => "misuse",
            ErrorKind::Other => "other",
        };
        f.write_str(label)
    }
}

impl From<io::ErrorKind> for ErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            io::ErrorKind::InvalidData => ErrorKind::InvalidData,
            _ => ErrorKind::Io,
        }
    }
}

/// A failure of the wrapped operation or of a stage.
///
/// `recovered` carries the substitute value of a recoverable failure. A stage
/// returning an error without it halts the chain.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered: Option<Value>,
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            recovered: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Unrecoverable stage failure: the chain stops here.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Stage, message)
    }

    /// Recoverable stage failure: `substitute` becomes the value handed to the next stage.
    pub fn recoverable(message: impl Into<String>, substitute: Value) -> Self {
        Self::new(ErrorKind::Stage, message).with_recovered(substitute)
    }

    pub fn misuse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Misuse, message)
    }

    /// Builds an error from an I/O failure, naming the resource it concerned.
    pub fn from_io(error: &io::Error, resource: &str) -> Self {
        Self::new(error.kind().into(), format!("{}, '{}'", error, resource))
    }

    pub fn with_recovered(mut self, substitute: Value) -> Self {
        self.recovered = Some(substitute);
        self
    }

    pub fn is_recoverable(&self) -> bool {
        self.recovered.is_some()
    }

    pub fn take_recovered(&mut self) -> Option<Value> {
        self.recovered.take()
    }
}

impl From<io::Error> for OperationError {
    fn from(error: io::Error) -> Self {
        Self::new(error.kind().into(), error.to_string())
    }
}
