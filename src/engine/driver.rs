// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Driver: the resumption loop of one pipeline run.
//!
//! The driver owns its run and its diagnostic log. Every suspension the run
//! yields is turned into an external call that receives a fresh
//! [`Continuation`] bound back to this driver, so each completion re-enters
//! the run exactly once. Execution is single-threaded and cooperative: a
//! resumption does the work it can and returns control immediately.
//!
//! A continuation fired while the driver is already on the stack for the same
//! run (an operation or stage that completes synchronously) is queued and
//! picked up by the outer loop instead of recursing, which keeps long chains
//! of synchronous completions stack-safe.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::Span;

use crate::config::EngineConfig;
use crate::engine::diagnostics::summarize;
use crate::engine::pipeline::RunSlot;
use crate::engine::run::{PipelineRun, Resume, RunState, Step, Suspension};
use crate::engine::{DiagnosticLog, OperationAdapter, Outcome, Preprocessor, RunReport};
use crate::errors::PipelineError;
use crate::observability::messages::engine::{
    DiagnosticDump, DriverMisuse, RunCompleted, RunFailed, RunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Continuation;

/// Where the terminal outcome of a run goes.
pub(crate) enum Sink {
    /// A parent run (or any caller) waiting on a continuation.
    Continuation(Continuation),
    /// A `RunHandle` held by the caller of `Invoker::invoke`.
    Report(Rc<RunSlot>),
}

struct DriverState {
    run: PipelineRun,
    adapter: Option<OperationAdapter>,
    preprocessor: Option<Preprocessor>,
    sink: Option<Sink>,
    config: EngineConfig,
    span: Span,
    active: bool,
    queued: Option<Resume>,
}

/// Handle on the resumption loop of one run. Cloning shares the same run.
#[derive(Clone)]
pub struct Driver {
    state: Rc<RefCell<DriverState>>,
}

impl Driver {
    pub(crate) fn new(
        run: PipelineRun,
        preprocessor: Option<Preprocessor>,
        sink: Sink,
        config: EngineConfig,
    ) -> Self {
        let span = RunStarted {
            pipeline: run.name(),
            stage_count: run.stage_count(),
        }
        .span("pipeline_run");

        Self {
            state: Rc::new(RefCell::new(DriverState {
                run,
                adapter: None,
                preprocessor,
                sink: Some(sink),
                config,
                span,
                active: false,
                queued: None,
            })),
        }
    }

    pub(crate) fn start(&self) -> Result<(), PipelineError> {
        {
            let state = self.state.borrow();
            if state.config.trace {
                RunStarted {
                    pipeline: state.run.name(),
                    stage_count: state.run.stage_count(),
                }
                .log();
            }
        }
        self.advance(Resume::Start)
    }

    /// Delivers the outcome the run is currently suspended on.
    ///
    /// Resuming a run that is not waiting for an outcome (for instance one
    /// that already completed) is a contract violation and is reported as
    /// [`PipelineError::ResumedOutOfOrder`].
    pub fn resume(&self, outcome: Outcome) -> Result<(), PipelineError> {
        self.advance(Resume::Outcome(outcome))
    }

    pub fn state(&self) -> RunState {
        self.state.borrow().run.state()
    }

    pub fn is_complete(&self) -> bool {
        self.state() == RunState::Completed
    }

    fn advance(&self, event: Resume) -> Result<(), PipelineError> {
        {
            let mut state = self.state.borrow_mut();
            if state.active {
                if state.queued.is_some() {
                    let error = PipelineError::ResumedOutOfOrder {
                        pipeline: state.run.name().to_string(),
                        state: "holding an undelivered outcome",
                        event: "another outcome",
                    };
                    DriverMisuse {
                        pipeline: state.run.name(),
                        error: &error,
                    }
                    .log();
                    return Err(error);
                }
                state.queued = Some(event);
                return Ok(());
            }
            state.active = true;
        }

        let span = self.state.borrow().span.clone();
        let _entered = span.enter();

        let mut result = Ok(());
        let mut next = Some(event);
        while let Some(event) = next.take() {
            let follow_up = match self.step(event) {
                Ok(follow_up) => follow_up,
                Err(error) => {
                    DriverMisuse {
                        pipeline: self.state.borrow().run.name(),
                        error: &error,
                    }
                    .log();
                    result = Err(error);
                    None
                }
            };
            next = follow_up.or_else(|| self.state.borrow_mut().queued.take());
        }

        self.state.borrow_mut().active = false;
        result
    }

    /// Resumes the run once and performs whatever its suspension asks for.
    /// Returns an event to feed back immediately, if any.
    fn step(&self, event: Resume) -> Result<Option<Resume>, PipelineError> {
        let step = self.state.borrow_mut().run.resume(event)?;

        match step {
            Step::Suspended(Suspension::Operation(operation)) => {
                let mut state = self.state.borrow_mut();
                state.adapter = Some(OperationAdapter::new(operation));
                Ok(Some(Resume::Preprocess(state.preprocessor.clone())))
            }
            Step::Suspended(Suspension::Invoke(args)) => {
                let adapter = {
                    let mut state = self.state.borrow_mut();
                    state.adapter.take().ok_or_else(|| PipelineError::MissingOperation {
                        pipeline: state.run.name().to_string(),
                    })?
                };
                adapter.bind(self.continuation()).call(args);
                Ok(None)
            }
            Step::Suspended(Suspension::Stage { stage, call }) => {
                stage.resume(call, self.continuation());
                Ok(None)
            }
            Step::Completed(outcome) => {
                self.deliver(outcome);
                Ok(None)
            }
        }
    }

    fn continuation(&self) -> Continuation {
        let driver = self.clone();
        Continuation::new(move |outcome| {
            // Failures are reported by `advance`; the completing party has
            // nowhere to send them.
            let _ = driver.resume(outcome);
        })
    }

    fn deliver(&self, outcome: Outcome) {
        let (sink, diagnostics, pipeline, config) = {
            let mut state = self.state.borrow_mut();
            (
                state.sink.take(),
                state.run.take_log(),
                state.run.name().to_string(),
                state.config.clone(),
            )
        };

        report_completion(&pipeline, &config, &outcome, &diagnostics);

        match sink {
            Some(Sink::Continuation(done)) => done.complete(outcome),
            Some(Sink::Report(slot)) => slot.fill(RunReport {
                outcome,
                diagnostics,
            }),
            None => {}
        }
    }
}

fn report_completion(
    pipeline: &str,
    config: &EngineConfig,
    outcome: &Outcome,
    diagnostics: &DiagnosticLog,
) {
    if config.trace {
        for (index, entry) in diagnostics.iter().enumerate() {
            DiagnosticDump {
                pipeline,
                index,
                entry,
            }
            .log();
        }
        RunCompleted {
            pipeline,
            diagnostics: diagnostics.len(),
            succeeded: outcome.is_ok(),
        }
        .log();
    }

    if let Err(error) = outcome {
        if !error.is_recoverable() {
            let summary = if config.trace {
                error.message.clone()
            } else {
                summarize(&error.message, config.summary_lines)
            };
            RunFailed {
                pipeline,
                kind: error.kind,
                summary: &summary,
            }
            .log();
        }
    }
}
