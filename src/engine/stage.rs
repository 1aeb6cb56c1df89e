// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stages: the post-processing steps a run threads its value through.
//!
//! A stage is decided at registration time to be either a synchronous
//! [`Transform`] or a [`Resumable`] that may suspend the run. Call-time
//! arguments are tagged the same way through [`CallArg`], so the run never has
//! to guess whether an argument is data or a stage.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::engine::DiagnosticLog;
use crate::errors::OperationError;
use crate::traits::Resumable;

/// Borrowed view of the tuple a transform receives.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    /// Set when the operation or the previous stage failed.
    pub error: Option<&'a OperationError>,
    pub value: &'a Value,
    /// Arguments the operation was called with, after preprocessing.
    pub args: &'a [Value],
    pub log: &'a DiagnosticLog,
}

/// Owned `(error, value, args, log)` tuple handed to a resumable stage.
#[derive(Debug, Clone)]
pub struct StageCall {
    pub error: Option<OperationError>,
    pub value: Value,
    pub args: Vec<Value>,
    pub log: DiagnosticLog,
}

impl StageCall {
    pub fn input(&self) -> StageInput<'_> {
        StageInput {
            error: self.error.as_ref(),
            value: &self.value,
            args: &self.args,
            log: &self.log,
        }
    }
}

type TransformFn = dyn Fn(&StageInput<'_>) -> Result<Value, OperationError>;

/// A named synchronous stage.
#[derive(Clone)]
pub struct Transform {
    name: Rc<str>,
    func: Rc<TransformFn>,
}

impl Transform {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&StageInput<'_>) -> Result<Value, OperationError> + 'static,
    {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, input: &StageInput<'_>) -> Result<Value, OperationError> {
        (self.func)(input)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

#[derive(Clone)]
pub enum Stage {
    Transform(Transform),
    Resumable(Rc<dyn Resumable>),
}

impl Stage {
    pub fn transform<F>(name: &str, func: F) -> Self
    where
        F: Fn(&StageInput<'_>) -> Result<Value, OperationError> + 'static,
    {
        Stage::Transform(Transform::new(name, func))
    }

    pub fn resumable(stage: impl Resumable + 'static) -> Self {
        Stage::Resumable(Rc::new(stage))
    }

    /// Registers a resumable that is also held elsewhere, e.g. an osculator
    /// shared by several pipelines.
    pub fn shared(stage: Rc<dyn Resumable>) -> Self {
        Stage::Resumable(stage)
    }

    pub fn name(&self) -> &str {
        match self {
            Stage::Transform(transform) => transform.name(),
            Stage::Resumable(stage) => stage.name(),
        }
    }
}

impl From<Transform> for Stage {
    fn from(transform: Transform) -> Self {
        Stage::Transform(transform)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Transform(transform) => f.debug_tuple("Transform").field(&transform.name()).finish(),
            Stage::Resumable(stage) => f.debug_tuple("Resumable").field(&stage.name()).finish(),
        }
    }
}

/// One argument of an invoker call: plain data forwarded to the operation, or
/// a stage appended to this run's chain.
#[derive(Debug, Clone)]
pub enum CallArg {
    Value(Value),
    Stage(Stage),
}

impl From<Value> for CallArg {
    fn from(value: Value) -> Self {
        CallArg::Value(value)
    }
}

impl From<&str> for CallArg {
    fn from(value: &str) -> Self {
        CallArg::Value(Value::String(value.to_string()))
    }
}

impl From<String> for CallArg {
    fn from(value: String) -> Self {
        CallArg::Value(Value::String(value))
    }
}

impl From<Stage> for CallArg {
    fn from(stage: Stage) -> Self {
        CallArg::Stage(stage)
    }
}

impl From<Transform> for CallArg {
    fn from(transform: Transform) -> Self {
        CallArg::Stage(Stage::Transform(transform))
    }
}
