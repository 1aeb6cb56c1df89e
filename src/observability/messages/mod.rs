// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable text and
//! [`StructuredLog`] to emit it as a `tracing` event (or open a span) with
//! structured fields attached.
//!
//! # Organization
//!
//! * `engine` - run lifecycle, operation calls and driver events
//! * `stage` - stage execution, recovery and osculation events

use tracing::Span;

pub mod engine;
pub mod stage;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
