// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operation and stage backends for the pipeline engine.
//!
//! # Available Backends
//!
//! ## Filesystem Backend
//! Asynchronous file reads wrapped as an [`Operation`](crate::traits::Operation):
//! - **ReadFile**: `[path, encoding?]` in, text or bytes out
//! - **Execution**: spawned on the current `LocalSet`, completes through the run's continuation
//!
//! ## Local Backend
//! In-process stages and helpers:
//! - **Stages**: `check_read`, `trim_eof`, `change_case_upper`, `change_case_lower`, `print`, `report_end`
//! - **Adapters**: `FnOperation` and `AsyncOperation` wrap closures as operations
//! - **Preprocessing**: `default_encoding` fills in the text encoding argument
//!
//! ## Stub Backend (Test-Only)
//! Operations and stages whose completions the test controls:
//! - **ManualOperation**: parks continuations until the test completes them
//! - **ImmediateOperation**: completes before `call` returns
//! - **FailingOperation**: fails with an I/O style error
//! - **DeferredStage**: a resumable stage completed by the test
//! - **Note**: NOT available in production builds
//!
//! # Examples
//!
//! ## Using Local Stages
//! ```rust
//! use thud_clunk::backends::local::LocalStageFactory;
//!
//! let stage = LocalStageFactory::create("trim_eof")?;
//! assert_eq!(stage.name(), "trim_eof");
//! # Ok::<(), thud_clunk::PipelineError>(())
//! ```

pub mod fs;
pub mod local;
#[cfg(test)]
pub mod stub;
