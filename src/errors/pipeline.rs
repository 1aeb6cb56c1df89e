// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Developer-misuse errors.
//!
//! These are returned to the caller immediately. They never enter a run's
//! diagnostic log.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A pipeline was built without the operation it is supposed to wrap.
    #[error("pipeline '{pipeline}' has no operation to wrap")]
    MissingOperation { pipeline: String },

    /// A run was resumed with an event it is not waiting for, e.g. a second
    /// completion after the run already finished.
    #[error("pipeline '{pipeline}' resumed with {event} while {state}")]
    ResumedOutOfOrder {
        pipeline: String,
        state: &'static str,
        event: &'static str,
    },

    /// An osculator needs at least one merge stage.
    #[error("osculator '{osculator}' requires at least one merge stage")]
    EmptyOsculation { osculator: String },

    /// An osculator was stepped more times than it has merge stages.
    #[error("osculator '{osculator}' exhausted: all {merge_stages} merge stages already ran")]
    OsculationExhausted {
        osculator: String,
        merge_stages: usize,
    },

    /// A stage name that no factory knows about.
    #[error("unknown stage '{0}'")]
    UnknownStage(String),
}
