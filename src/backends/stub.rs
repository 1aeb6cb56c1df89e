// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::engine::{Outcome, StageCall};
use crate::errors::OperationError;
use crate::traits::{Continuation, Operation, Resumable};

/// An operation whose completions are driven by the test.
///
/// Every call is recorded and its continuation parked until the test calls
/// `complete_next` (oldest first) or `complete_last` (newest first).
pub struct ManualOperation {
    name: String,
    calls: RefCell<Vec<Vec<Value>>>,
    waiting: RefCell<VecDeque<Continuation>>,
}

impl ManualOperation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: RefCell::new(Vec::new()),
            waiting: RefCell::new(VecDeque::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.calls.borrow().clone()
    }

    pub fn pending(&self) -> usize {
        self.waiting.borrow().len()
    }

    pub fn complete_next(&self, outcome: Outcome) {
        // Release the borrow before completing; the run may call back in.
        let done = self.waiting.borrow_mut().pop_front();
        done.expect("no pending call to complete").complete(outcome);
    }

    pub fn complete_last(&self, outcome: Outcome) {
        let done = self.waiting.borrow_mut().pop_back();
        done.expect("no pending call to complete").complete(outcome);
    }
}

impl Operation for ManualOperation {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: Vec<Value>, done: Continuation) {
        self.calls.borrow_mut().push(args);
        self.waiting.borrow_mut().push_back(done);
    }
}

/// An operation that completes synchronously with a fixed outcome.
pub struct ImmediateOperation {
    outcome: Outcome,
}

impl ImmediateOperation {
    pub fn ok(value: Value) -> Self {
        Self { outcome: Ok(value) }
    }

    pub fn err(error: OperationError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl Operation for ImmediateOperation {
    fn name(&self) -> &str {
        "immediate"
    }

    fn call(&self, _args: Vec<Value>, done: Continuation) {
        done.complete(self.outcome.clone());
    }
}

/// An operation that always fails with an I/O style error naming its first argument.
pub struct FailingOperation {
    kind: std::io::ErrorKind,
}

impl FailingOperation {
    pub fn new(kind: std::io::ErrorKind) -> Self {
        Self { kind }
    }
}

impl Operation for FailingOperation {
    fn name(&self) -> &str {
        "failing"
    }

    fn call(&self, args: Vec<Value>, done: Continuation) {
        let resource = args
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let error = std::io::Error::new(self.kind, "simulated failure");
        done.fail(OperationError::from_io(&error, &resource));
    }
}

/// A resumable stage that completes before `resume` returns.
pub struct ImmediateResumable {
    name: String,
    func: fn(&StageCall) -> Outcome,
}

impl ImmediateResumable {
    pub fn increment() -> Self {
        Self {
            name: "increment".to_string(),
            func: |call| Ok(json!(call.value.as_i64().unwrap_or_default() + 1)),
        }
    }
}

impl Resumable for ImmediateResumable {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&self, call: StageCall, done: Continuation) {
        done.complete((self.func)(&call));
    }
}

/// A resumable stage that parks every call until the test completes it.
pub struct DeferredStage {
    name: String,
    waiting: RefCell<VecDeque<(StageCall, Continuation)>>,
}

impl DeferredStage {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            waiting: RefCell::new(VecDeque::new()),
        }
    }

    /// Values handed to the calls still waiting, oldest first.
    pub fn pending_values(&self) -> Vec<Value> {
        self.waiting
            .borrow()
            .iter()
            .map(|(call, _)| call.value.clone())
            .collect()
    }

    pub fn complete_next(&self, outcome: Outcome) {
        let parked = self.waiting.borrow_mut().pop_front();
        let (_, done) = parked.expect("no pending stage call to complete");
        done.complete(outcome);
    }
}

impl Resumable for DeferredStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&self, call: StageCall, done: Continuation) {
        self.waiting.borrow_mut().push_back((call, done));
    }
}
