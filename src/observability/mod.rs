// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in the pipeline engine. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names of structured events consistent
//! * Provide consistent, human-readable output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - run lifecycle, operation calls and driver events
//! * `messages::stage` - stage execution, recovery and osculation events
//!
//! # Verbosity
//!
//! Transition messages are only emitted when `EngineConfig::trace` is set.
//! Developer warnings and unrecoverable failures are always emitted.
//!
//! # Usage
//!
//! ```rust
//! use thud_clunk::observability::messages::engine::RunFailed;
//! use thud_clunk::observability::messages::StructuredLog;
//! use thud_clunk::errors::ErrorKind;
//!
//! RunFailed {
//!     pipeline: "read_file",
//!     kind: ErrorKind::NotFound,
//!     summary: "Failed to find file \"notes.txt\".",
//! }
//! .log();
//! ```

pub mod messages;
