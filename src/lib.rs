// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // operations and built-in stages
pub mod config;     // engine settings + loaders
pub mod engine;     // runs, driver, composition
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // operation and resumable-stage seams

pub use backends::local::{AsyncOperation, FnOperation};
pub use engine::{
    exit_status, CallArg, DiagnosticLog, Invoker, Osculator, Outcome, Pipeline, Preprocessor,
    RunHandle, RunReport, Stage, SubPipeline, Transform,
};
pub use errors::{ErrorKind, OperationError, PipelineError};
pub use traits::{Continuation, Operation, Resumable};
