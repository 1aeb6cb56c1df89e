// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operation adapter: turns `op(args..., continuation)` into a two-step call.
//!
//! ```text
//! OperationAdapter::new(op)      // operation known, nothing else
//!     .bind(continuation)        // step 1: capture where the outcome goes
//!     .call(args)                // step 2: capture args, call op exactly once
//! ```
//!
//! The adapter only forwards. It never completes the continuation itself and
//! it never retries.

use serde_json::Value;
use std::rc::Rc;
use tracing::trace;

use crate::traits::{Continuation, Operation};

#[derive(Clone)]
pub struct OperationAdapter {
    operation: Rc<dyn Operation>,
}

impl OperationAdapter {
    pub fn new(operation: Rc<dyn Operation>) -> Self {
        Self { operation }
    }

    pub fn operation_name(&self) -> &str {
        self.operation.name()
    }

    pub fn bind(&self, done: Continuation) -> Thunk {
        Thunk {
            operation: Rc::clone(&self.operation),
            done,
        }
    }
}

/// An operation with its continuation already attached, waiting for arguments.
pub struct Thunk {
    operation: Rc<dyn Operation>,
    done: Continuation,
}

impl Thunk {
    pub fn call(self, args: Vec<Value>) {
        trace!(operation = self.operation.name(), args = ?args, "invoking wrapped operation");
        self.operation.call(args, self.done);
    }
}
