// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use serde_json::Value;

use crate::engine::Outcome;
use crate::errors::OperationError;

/// A one-shot unit of work that reports back through a continuation.
///
/// Implementations must complete `done` exactly once, either before `call`
/// returns or later (typically from a task spawned on the current `LocalSet`).
pub trait Operation {
    fn name(&self) -> &str;

    fn call(&self, args: Vec<Value>, done: Continuation);
}

/// Completion callback handed to an operation or a resumable stage.
///
/// Consumed by value, so a continuation can only ever deliver one outcome.
pub struct Continuation {
    complete: Box<dyn FnOnce(Outcome)>,
}

impl Continuation {
    pub fn new(complete: impl FnOnce(Outcome) + 'static) -> Self {
        Self {
            complete: Box::new(complete),
        }
    }

    pub fn complete(self, outcome: Outcome) {
        (self.complete)(outcome)
    }

    pub fn succeed(self, value: Value) {
        self.complete(Ok(value))
    }

    pub fn fail(self, error: OperationError) {
        self.complete(Err(error))
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation").finish_non_exhaustive()
    }
}
