// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run lifecycle and driver events.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Wrapped operation calls and argument preprocessing
//! * Unrecoverable failures and their summaries
//! * Contract violations detected by the driver

use crate::engine::DiagnosticEntry;
use crate::errors::{ErrorKind, OperationError, PipelineError};
use crate::observability::messages::StructuredLog;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A pipeline run was started by its invoker.
///
/// # Log Level
/// `info!` - Traced transition
///
/// # Example
/// ```
/// use thud_clunk::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     pipeline: "read_file",
///     stage_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub pipeline: &'a str,
    pub stage_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline '{}' run with {} static stages",
            self.pipeline, self.stage_count
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            pipeline = self.pipeline,
            stage_count = self.stage_count,
        )
    }
}

/// The wrapped operation is about to be called with its final arguments.
///
/// # Log Level
/// `info!` - Traced transition
pub struct OperationInvoked<'a> {
    pub pipeline: &'a str,
    pub operation: &'a str,
    pub args: &'a [Value],
}

impl Display for OperationInvoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' invoking operation '{}' with args {}",
            self.pipeline,
            self.operation,
            Value::Array(self.args.to_vec())
        )
    }
}

impl StructuredLog for OperationInvoked<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            operation = self.operation,
            arg_count = self.args.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "operation_invoked",
            span_name = name,
            pipeline = self.pipeline,
            operation = self.operation,
        )
    }
}

/// The operation failed and no stage exists to decide what the failure means.
///
/// # Log Level
/// `warn!` - Developer warning, always emitted
///
/// # Example
/// ```
/// use thud_clunk::errors::OperationError;
/// use thud_clunk::observability::messages::engine::OperationFailedWithoutStages;
///
/// let error = OperationError::not_found("no such file or directory, 'notes.txt'");
/// let msg = OperationFailedWithoutStages {
///     pipeline: "read_file",
///     operation: "read_file",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct OperationFailedWithoutStages<'a> {
    pub pipeline: &'a str,
    pub operation: &'a str,
    pub error: &'a OperationError,
}

impl Display for OperationFailedWithoutStages<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "DevWarning: operation '{}' of pipeline '{}' failed and no stage is registered, so the failure policy is unknown: {}",
            self.operation, self.pipeline, self.error
        )
    }
}

impl StructuredLog for OperationFailedWithoutStages<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline = self.pipeline,
            operation = self.operation,
            kind = %self.error.kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "operation_failed_without_stages",
            span_name = name,
            pipeline = self.pipeline,
            operation = self.operation,
        )
    }
}

/// The argument preprocessor did not produce an argument sequence; its
/// effect was discarded for this run.
///
/// # Log Level
/// `warn!` - Developer warning, always emitted
pub struct PreprocessorRejected<'a> {
    pub pipeline: &'a str,
    pub preprocessor: &'a str,
    pub error: &'a OperationError,
}

impl Display for PreprocessorRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "DevError: preprocessor '{}' of pipeline '{}' must return an argument sequence ({}); ignoring it",
            self.preprocessor, self.pipeline, self.error
        )
    }
}

impl StructuredLog for PreprocessorRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline = self.pipeline,
            preprocessor = self.preprocessor,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "preprocessor_rejected",
            span_name = name,
            pipeline = self.pipeline,
            preprocessor = self.preprocessor,
        )
    }
}

/// A run reached its terminal state.
///
/// # Log Level
/// `info!` - Traced transition
pub struct RunCompleted<'a> {
    pub pipeline: &'a str,
    pub diagnostics: usize,
    pub succeeded: bool,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let status = if self.succeeded { "succeeded" } else { "failed" };
        write!(
            f,
            "Pipeline '{}' run {} with {} logged diagnostics",
            self.pipeline, status, self.diagnostics
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            diagnostics = self.diagnostics,
            succeeded = self.succeeded,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            pipeline = self.pipeline,
            succeeded = self.succeeded,
        )
    }
}

/// A run ended with an unrecoverable failure.
///
/// `summary` is the trimmed failure message unless tracing is enabled.
///
/// # Log Level
/// `error!` - Always emitted
pub struct RunFailed<'a> {
    pub pipeline: &'a str,
    pub kind: ErrorKind,
    pub summary: &'a str,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline '{}' failed ({}): {}", self.pipeline, self.kind, self.summary)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            kind = %self.kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "run_failed",
            span_name = name,
            pipeline = self.pipeline,
            kind = %self.kind,
        )
    }
}

/// One entry of a run's diagnostic log, dumped at completion when tracing.
pub struct DiagnosticDump<'a> {
    pub pipeline: &'a str,
    pub index: usize,
    pub entry: &'a DiagnosticEntry,
}

impl Display for DiagnosticDump<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} diagnostics[{}] = {}", self.pipeline, self.index, self.entry)
    }
}

impl StructuredLog for DiagnosticDump<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            index = self.index,
            stage = %self.entry.stage,
            kind = %self.entry.error.kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "diagnostic",
            span_name = name,
            pipeline = self.pipeline,
            index = self.index,
        )
    }
}

/// The driver was resumed in a way that breaks the one-completion-per-suspension contract.
///
/// # Log Level
/// `error!` - Always emitted
pub struct DriverMisuse<'a> {
    pub pipeline: &'a str,
    pub error: &'a PipelineError,
}

impl Display for DriverMisuse<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "DevError: driver of pipeline '{}': {}", self.pipeline, self.error)
    }
}

impl StructuredLog for DriverMisuse<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "driver_misuse",
            span_name = name,
            pipeline = self.pipeline,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_failed_display() {
        let msg = RunFailed {
            pipeline: "read_file",
            kind: ErrorKind::NotFound,
            summary: "Failed to find file \"x\".",
        };
        assert_eq!(
            msg.to_string(),
            "Pipeline 'read_file' failed (not_found): Failed to find file \"x\"."
        );
    }

    #[test]
    fn test_operation_invoked_renders_args_as_json() {
        let args = vec![json!("a.txt"), json!("utf-8")];
        let msg = OperationInvoked {
            pipeline: "read_file",
            operation: "read_file",
            args: &args,
        };
        assert!(msg.to_string().ends_with("[\"a.txt\",\"utf-8\"]"));
    }
}
