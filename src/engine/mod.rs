// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline execution engine.
//!
//! * `adapter` - two-step operation adapter (`bind` the continuation, then `call`)
//! * `stage` - transform and resumable stages, call-time argument tagging
//! * `run` - the explicit run state machine
//! * `driver` - the resumption loop that feeds completions back into a run
//! * `pipeline` - pipeline definitions, invokers, run handles, nested pipelines
//! * `osculate` - log-sharing rendezvous between pipelines
//! * `diagnostics` - per-run diagnostic log

pub mod adapter;
pub mod diagnostics;
pub mod driver;
pub mod osculate;
pub mod pipeline;
pub mod run;
pub mod stage;

use serde_json::Value;

use crate::errors::OperationError;

/// Result of an operation, a stage, or a whole run.
pub type Outcome = Result<Value, OperationError>;

pub use adapter::{OperationAdapter, Thunk};
pub use diagnostics::{DiagnosticEntry, DiagnosticLog};
pub use driver::Driver;
pub use osculate::Osculator;
pub use pipeline::{
    exit_status, Invoker, Pipeline, PipelineBuilder, Preprocessor, RunHandle, RunReport, SubPipeline,
};
pub use run::{OperationPhase, PipelineRun, RunState};
pub use stage::{CallArg, Stage, StageCall, StageInput, Transform};
