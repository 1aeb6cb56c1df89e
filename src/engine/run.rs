// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The resumable state of one pipeline run.
//!
//! A `PipelineRun` never blocks and never calls the operation itself. Each
//! call to [`PipelineRun::resume`] moves it forward by exactly one event and
//! returns either the next suspension point or the terminal outcome. The
//! [`Driver`](crate::engine::Driver) performs the effects a suspension asks
//! for and feeds the resulting events back in.
//!
//! ```text
//! NotStarted --Start--> AwaitingOperation(Binding)         yields the operation
//!            --Preprocess--> AwaitingOperation(InFlight)   yields final args
//!            --Outcome--> RunningStage(i) ... RunningStage(n-1)
//!                                             --> Completed
//! ```

use serde_json::Value;
use std::rc::Rc;

use crate::engine::{
    CallArg, DiagnosticLog, Outcome, Pipeline, Preprocessor, Stage, StageCall, StageInput,
};
use crate::errors::{OperationError, PipelineError};
use crate::observability::messages::engine::{
    OperationFailedWithoutStages, OperationInvoked, PreprocessorRejected,
};
use crate::observability::messages::stage::{
    StageFatalFailure, StageRecoverableFailure, StageRecovered, StageStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Operation, Resumable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPhase {
    /// The operation reference was handed out; arguments are not final yet.
    Binding,
    /// The operation was invoked and its single completion is pending.
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    AwaitingOperation(OperationPhase),
    RunningStage(usize),
    Completed,
}

impl RunState {
    fn describe(&self) -> &'static str {
        match self {
            RunState::NotStarted => "not started",
            RunState::AwaitingOperation(OperationPhase::Binding) => "binding the operation",
            RunState::AwaitingOperation(OperationPhase::InFlight) => "awaiting the operation",
            RunState::RunningStage(_) => "awaiting a resumable stage",
            RunState::Completed => "completed",
        }
    }
}

/// Event fed into a run by its driver.
pub(crate) enum Resume {
    Start,
    Preprocess(Option<Preprocessor>),
    Outcome(Outcome),
}

impl Resume {
    fn describe(&self) -> &'static str {
        match self {
            Resume::Start => "a start request",
            Resume::Preprocess(_) => "a preprocessor",
            Resume::Outcome(_) => "an outcome",
        }
    }
}

/// What a suspended run is waiting for.
pub(crate) enum Suspension {
    /// The run wants this operation wrapped before it finalizes arguments.
    Operation(Rc<dyn Operation>),
    /// Call the wrapped operation with these arguments.
    Invoke(Vec<Value>),
    /// Resume a nested stage and wait for its terminal outcome.
    Stage {
        stage: Rc<dyn Resumable>,
        call: StageCall,
    },
}

pub(crate) enum Step {
    Suspended(Suspension),
    Completed(Outcome),
}

pub struct PipelineRun {
    pipeline: String,
    operation: Option<Rc<dyn Operation>>,
    stages: Vec<Stage>,
    call_args: Vec<CallArg>,
    args: Vec<Value>,
    value: Value,
    error: Option<OperationError>,
    log: DiagnosticLog,
    state: RunState,
    trace: bool,
}

impl PipelineRun {
    /// A fresh run of `pipeline`. The static stage list is copied so stages
    /// discovered among `call_args` stay local to this run.
    pub(crate) fn new(pipeline: &Pipeline, call_args: Vec<CallArg>, trace: bool) -> Self {
        Self {
            pipeline: pipeline.name().to_string(),
            operation: Some(pipeline.operation()),
            stages: pipeline.stages().to_vec(),
            call_args,
            args: Vec::new(),
            value: Value::Null,
            error: None,
            log: DiagnosticLog::new(),
            state: RunState::NotStarted,
            trace,
        }
    }

    /// A run with no operation that starts its stage chain from an incoming
    /// `(error, value, args, log)` tuple.
    pub(crate) fn from_stage_call(name: &str, stages: &[Stage], call: StageCall, trace: bool) -> Self {
        Self {
            pipeline: name.to_string(),
            operation: None,
            stages: stages.to_vec(),
            call_args: Vec::new(),
            args: call.args,
            value: call.value,
            error: call.error,
            log: call.log,
            state: RunState::NotStarted,
            trace,
        }
    }

    pub fn name(&self) -> &str {
        &self.pipeline
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub(crate) fn take_log(&mut self) -> DiagnosticLog {
        std::mem::take(&mut self.log)
    }

    pub(crate) fn resume(&mut self, event: Resume) -> Result<Step, PipelineError> {
        match (self.state, event) {
            (RunState::NotStarted, Resume::Start) => Ok(self.start()),
            (RunState::AwaitingOperation(OperationPhase::Binding), Resume::Preprocess(preprocessor)) => {
                Ok(self.bind_args(preprocessor))
            }
            (RunState::AwaitingOperation(OperationPhase::InFlight), Resume::Outcome(outcome)) => {
                Ok(self.receive_operation(outcome))
            }
            (RunState::RunningStage(index), Resume::Outcome(outcome)) => Ok(self.receive_stage(index, outcome)),
            (state, event) => Err(PipelineError::ResumedOutOfOrder {
                pipeline: self.pipeline.clone(),
                state: state.describe(),
                event: event.describe(),
            }),
        }
    }

    fn start(&mut self) -> Step {
        match &self.operation {
            Some(operation) => {
                self.state = RunState::AwaitingOperation(OperationPhase::Binding);
                Step::Suspended(Suspension::Operation(Rc::clone(operation)))
            }
            None => self.run_stages(0),
        }
    }

    fn bind_args(&mut self, preprocessor: Option<Preprocessor>) -> Step {
        let mut args = Vec::with_capacity(self.call_args.len());
        for arg in std::mem::take(&mut self.call_args) {
            match arg {
                CallArg::Stage(stage) => self.stages.push(stage),
                CallArg::Value(value) => args.push(value),
            }
        }

        if let Some(preprocessor) = preprocessor {
            match preprocessor.apply(&args) {
                Ok(processed) => args = processed,
                Err(error) => PreprocessorRejected {
                    pipeline: &self.pipeline,
                    preprocessor: preprocessor.name(),
                    error: &error,
                }
                .log(),
            }
        }

        self.args = args;
        self.state = RunState::AwaitingOperation(OperationPhase::InFlight);

        if self.trace {
            OperationInvoked {
                pipeline: &self.pipeline,
                operation: &self.operation_name(),
                args: &self.args,
            }
            .log();
        }
        Step::Suspended(Suspension::Invoke(self.args.clone()))
    }

    fn receive_operation(&mut self, outcome: Outcome) -> Step {
        match outcome {
            Ok(value) => {
                self.value = value;
                self.run_stages(0)
            }
            Err(mut error) => {
                let operation = self.operation_name();
                if self.stages.is_empty() {
                    OperationFailedWithoutStages {
                        pipeline: &self.pipeline,
                        operation: &operation,
                        error: &error,
                    }
                    .log();
                    self.state = RunState::Completed;
                    return Step::Completed(Err(error));
                }
                // A nested invoker that ended in a recoverable failure still
                // produced a usable value.
                if let Some(substitute) = error.take_recovered() {
                    self.value = substitute;
                }
                self.log.record(&operation, &self.args, &error);
                self.error = Some(error);
                self.run_stages(0)
            }
        }
    }

    fn receive_stage(&mut self, index: usize, outcome: Outcome) -> Step {
        let name = self.stages[index].name().to_string();
        if let Some(terminal) = self.absorb(index, &name, outcome) {
            return Step::Completed(terminal);
        }
        self.run_stages(index + 1)
    }

    fn run_stages(&mut self, from: usize) -> Step {
        for index in from..self.stages.len() {
            let stage = self.stages[index].clone();
            self.state = RunState::RunningStage(index);
            if self.trace {
                StageStarted {
                    pipeline: &self.pipeline,
                    stage: stage.name(),
                    index,
                    error_pending: self.error.is_some(),
                }
                .log();
            }

            match stage {
                Stage::Transform(transform) => {
                    let result = transform.apply(&StageInput {
                        error: self.error.as_ref(),
                        value: &self.value,
                        args: &self.args,
                        log: &self.log,
                    });
                    if let Some(terminal) = self.absorb(index, transform.name(), result) {
                        return Step::Completed(terminal);
                    }
                }
                Stage::Resumable(stage) => {
                    let call = StageCall {
                        error: self.error.clone(),
                        value: self.value.clone(),
                        args: self.args.clone(),
                        log: self.log.clone(),
                    };
                    return Step::Suspended(Suspension::Stage { stage, call });
                }
            }
        }
        Step::Completed(self.finish())
    }

    /// Folds one stage result into the run. Returns the terminal outcome when
    /// the failure is fatal.
    fn absorb(&mut self, index: usize, stage: &str, result: Outcome) -> Option<Outcome> {
        match result {
            Ok(value) => {
                if let Some(previous) = self.error.take() {
                    if self.trace {
                        StageRecovered {
                            pipeline: &self.pipeline,
                            stage,
                            error: &previous,
                        }
                        .log();
                    }
                }
                self.value = value;
                None
            }
            Err(mut error) => match error.take_recovered() {
                Some(substitute) => {
                    self.value = substitute;
                    self.log.record(stage, &self.args, &error);
                    if self.trace {
                        StageRecoverableFailure {
                            pipeline: &self.pipeline,
                            stage,
                            index,
                            error: &error,
                        }
                        .log();
                    }
                    // The next stage sees that a recovery happened before it.
                    self.error = Some(error);
                    None
                }
                None => {
                    self.log.record(stage, &self.args, &error);
                    if self.trace {
                        StageFatalFailure {
                            pipeline: &self.pipeline,
                            stage,
                            index,
                            error: &error,
                        }
                        .log();
                    }
                    self.error = None;
                    self.state = RunState::Completed;
                    Some(Err(error))
                }
            },
        }
    }

    fn finish(&mut self) -> Outcome {
        self.state = RunState::Completed;
        let value = std::mem::take(&mut self.value);
        match self.error.take() {
            // Only a recoverable failure can survive the last stage, so the
            // current value is its substitute.
            Some(error) => Err(error.with_recovered(value)),
            None => Ok(value),
        }
    }

    fn operation_name(&self) -> String {
        self.operation
            .as_ref()
            .map_or_else(|| self.pipeline.clone(), |operation| operation.name().to_string())
    }
}
