// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for stage execution events.

use crate::errors::OperationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A stage is about to run.
pub struct StageStarted<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub index: usize,
    pub error_pending: bool,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Post-processing '{}' in pipeline '{}' (stage {}, error pending: {})",
            self.stage, self.pipeline, self.index, self.error_pending
        )
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage = self.stage,
            index = self.index,
            error_pending = self.error_pending,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
            index = self.index,
        )
    }
}

/// A stage succeeded while an earlier failure was pending, clearing it.
pub struct StageRecovered<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub error: &'a OperationError,
}

impl Display for StageRecovered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' in pipeline '{}' recovered from error ({}): {}",
            self.stage, self.pipeline, self.error.kind, self.error
        )
    }
}

impl StructuredLog for StageRecovered<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            stage = self.stage,
            kind = %self.error.kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage_recovered",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
        )
    }
}

/// A stage failed but supplied a substitute value; the chain continues.
///
/// # Log Level
/// `warn!` - Traced transition
pub struct StageRecoverableFailure<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub index: usize,
    pub error: &'a OperationError,
}

impl Display for StageRecoverableFailure<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recoverable error in stage '{}' of pipeline '{}' (stage {}): {}",
            self.stage, self.pipeline, self.index, self.error
        )
    }
}

impl StructuredLog for StageRecoverableFailure<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline = self.pipeline,
            stage = self.stage,
            index = self.index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "stage_recoverable_failure",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
            index = self.index,
        )
    }
}

/// A stage failed without a substitute; no further stage runs.
///
/// # Log Level
/// `error!` - Traced transition (the run summary is emitted separately)
pub struct StageFatalFailure<'a> {
    pub pipeline: &'a str,
    pub stage: &'a str,
    pub index: usize,
    pub error: &'a OperationError,
}

impl Display for StageFatalFailure<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "UNRECOVERABLE error in stage '{}' of pipeline '{}' (stage {}): {}",
            self.stage, self.pipeline, self.index, self.error
        )
    }
}

impl StructuredLog for StageFatalFailure<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            stage = self.stage,
            index = self.index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "stage_fatal_failure",
            span_name = name,
            pipeline = self.pipeline,
            stage = self.stage,
            index = self.index,
        )
    }
}

/// An osculator merged an incoming log and ran one merge stage.
///
/// # Log Level
/// `debug!`
pub struct OsculationMerged<'a> {
    pub osculator: &'a str,
    pub step: usize,
    pub entries: usize,
}

impl Display for OsculationMerged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Osculator '{}' step {}: merged log holds {} entries",
            self.osculator, self.step, self.entries
        )
    }
}

impl StructuredLog for OsculationMerged<'_> {
    fn log(&self) {
        tracing::debug!(
            osculator = self.osculator,
            step = self.step,
            entries = self.entries,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "osculation",
            span_name = name,
            osculator = self.osculator,
            step = self.step,
        )
    }
}
