// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline definitions and the invoker that runs them.
//!
//! A [`Pipeline`] is a static definition: one operation plus an ordered stage
//! list. An [`Invoker`] is the reusable entry point built from it. Every call
//! to the invoker creates an independent run with its own copy of the stage
//! list, its own arguments and its own diagnostic log, so any number of runs
//! of the same invoker can be in flight at once.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use thud_clunk::{Continuation, FnOperation, Pipeline};
//!
//! let invoker = Pipeline::builder("shout")
//!     .operation(FnOperation::new("echo", |args, done: Continuation| {
//!         done.succeed(args.first().cloned().unwrap_or_default())
//!     }))
//!     .transform("upper", |input| {
//!         Ok(json!(input.value.as_str().unwrap_or_default().to_uppercase()))
//!     })
//!     .build()
//!     .unwrap()
//!     .invoker();
//!
//! let handle = invoker.invoke(vec!["hello".into()]);
//! assert_eq!(handle.report().unwrap().outcome, Ok(json!("HELLO")));
//! ```

use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tokio::sync::Notify;

use crate::config::consts::{FAILURE_EXIT_CODE, NOT_FOUND_EXIT_CODE};
use crate::config::EngineConfig;
use crate::engine::driver::{Driver, Sink};
use crate::engine::run::PipelineRun;
use crate::engine::{CallArg, DiagnosticLog, Outcome, Stage, StageCall, StageInput};
use crate::errors::{ErrorKind, OperationError, PipelineError};
use crate::traits::{Continuation, Operation, Resumable};

/// Static definition of a pipeline: the operation it wraps and its stages.
pub struct Pipeline {
    name: String,
    operation: Rc<dyn Operation>,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn builder(name: &str) -> PipelineBuilder {
        PipelineBuilder {
            name: name.to_string(),
            operation: None,
            stages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self) -> Rc<dyn Operation> {
        Rc::clone(&self.operation)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn invoker(self) -> Invoker {
        Invoker {
            pipeline: Rc::new(self),
            preprocessor: None,
            config: EngineConfig::default(),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("operation", &self.operation.name())
            .field("stages", &self.stages)
            .finish()
    }
}

pub struct PipelineBuilder {
    name: String,
    operation: Option<Rc<dyn Operation>>,
    stages: Vec<Stage>,
}

impl PipelineBuilder {
    pub fn operation(self, operation: impl Operation + 'static) -> Self {
        self.shared_operation(Rc::new(operation))
    }

    /// Wraps an operation that is also held elsewhere, such as another
    /// pipeline's invoker.
    pub fn shared_operation(mut self, operation: Rc<dyn Operation>) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn stage(mut self, stage: impl Into<Stage>) -> Self {
        self.stages.push(stage.into());
        self
    }

    pub fn transform<F>(self, name: &str, func: F) -> Self
    where
        F: Fn(&StageInput<'_>) -> Result<Value, OperationError> + 'static,
    {
        self.stage(Stage::transform(name, func))
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let operation = self
            .operation
            .ok_or_else(|| PipelineError::MissingOperation {
                pipeline: self.name.clone(),
            })?;
        Ok(Pipeline {
            name: self.name,
            operation,
            stages: self.stages,
        })
    }

    /// Builds a stage-only pipeline meant to be nested as a stage of another
    /// pipeline. Any operation set on the builder is ignored.
    pub fn build_sub_pipeline(self) -> SubPipeline {
        SubPipeline {
            name: self.name,
            stages: self.stages,
            config: EngineConfig::default(),
        }
    }
}

type PreprocessFn = dyn Fn(&[Value]) -> Result<Vec<Value>, OperationError>;

/// Rewrites the data arguments of a run before the operation is called.
///
/// A preprocessor that returns an error is ignored for that run: the original
/// arguments are used and a developer warning is emitted.
#[derive(Clone)]
pub struct Preprocessor {
    name: Rc<str>,
    func: Rc<PreprocessFn>,
}

impl Preprocessor {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, OperationError> + 'static,
    {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, args: &[Value]) -> Result<Vec<Value>, OperationError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor").field("name", &self.name).finish()
    }
}

/// Reusable entry point of a pipeline. Cheap to clone.
#[derive(Clone)]
pub struct Invoker {
    pipeline: Rc<Pipeline>,
    preprocessor: Option<Preprocessor>,
    config: EngineConfig,
}

impl Invoker {
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Starts a run. Returns once the run reaches its first suspension
    /// point; the handle fills in when the run completes.
    pub fn invoke<I>(&self, args: I) -> RunHandle
    where
        I: IntoIterator<Item = CallArg>,
    {
        self.driver(args).1
    }

    /// Starts a run whose terminal outcome is delivered to `done`.
    pub fn invoke_with<I>(&self, args: I, done: Continuation)
    where
        I: IntoIterator<Item = CallArg>,
    {
        self.launch(args, Sink::Continuation(done));
    }

    /// Starts a run and also returns its driver, for callers that need to
    /// observe or resume the run directly.
    pub fn driver<I>(&self, args: I) -> (Driver, RunHandle)
    where
        I: IntoIterator<Item = CallArg>,
    {
        let slot = Rc::new(RunSlot::default());
        let driver = self.launch(args, Sink::Report(Rc::clone(&slot)));
        (driver, RunHandle { slot })
    }

    fn launch<I>(&self, args: I, sink: Sink) -> Driver
    where
        I: IntoIterator<Item = CallArg>,
    {
        let run = PipelineRun::new(&self.pipeline, args.into_iter().collect(), self.config.trace);
        let driver = Driver::new(run, self.preprocessor.clone(), sink, self.config.clone());
        // A fresh run always accepts its start event; misuse is already logged.
        let _ = driver.start();
        driver
    }
}

/// Nesting by operation: an invoker can be the operation of another pipeline.
impl Operation for Invoker {
    fn name(&self) -> &str {
        self.pipeline.name()
    }

    fn call(&self, args: Vec<Value>, done: Continuation) {
        self.invoke_with(args.into_iter().map(CallArg::Value), done);
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("pipeline", &self.pipeline.name())
            .field("preprocessor", &self.preprocessor)
            .field("config", &self.config)
            .finish()
    }
}

/// Terminal result of a run together with everything it logged.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: Outcome,
    pub diagnostics: DiagnosticLog,
}

impl RunReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// True when the run logged failures it recovered from.
    pub fn has_warnings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// The terminal error, unless the run carries a recovered substitute for it.
    pub fn unrecoverable_error(&self) -> Option<&OperationError> {
        self.outcome.as_ref().err().filter(|e| !e.is_recoverable())
    }
}

/// Process exit status for a batch of finished runs.
///
/// `NOT_FOUND_EXIT_CODE` if any run ended in an unrecoverable `NotFound`,
/// `FAILURE_EXIT_CODE` for any other unrecoverable failure, `0` otherwise.
/// Recoverable terminal errors count as success.
pub fn exit_status(reports: &[RunReport]) -> u8 {
    let mut failures = reports.iter().filter_map(RunReport::unrecoverable_error).peekable();
    if failures.peek().is_none() {
        return 0;
    }
    if failures.any(|e| e.kind == ErrorKind::NotFound) {
        NOT_FOUND_EXIT_CODE
    } else {
        FAILURE_EXIT_CODE
    }
}

#[derive(Default)]
pub(crate) struct RunSlot {
    report: RefCell<Option<RunReport>>,
    notify: Notify,
}

impl RunSlot {
    pub(crate) fn fill(&self, report: RunReport) {
        *self.report.borrow_mut() = Some(report);
        self.notify.notify_one();
    }
}

/// Caller-side view of a run started with [`Invoker::invoke`].
///
/// Dropping the handle abandons the result; the run itself still reaches its
/// terminal state when its operation completes.
pub struct RunHandle {
    slot: Rc<RunSlot>,
}

impl RunHandle {
    pub fn is_complete(&self) -> bool {
        self.slot.report.borrow().is_some()
    }

    pub fn report(&self) -> Option<RunReport> {
        self.slot.report.borrow().clone()
    }

    /// Waits for the run to complete.
    pub async fn finished(self) -> RunReport {
        loop {
            if let Some(report) = self.slot.report.borrow_mut().take() {
                return report;
            }
            self.slot.notify.notified().await;
        }
    }
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHandle")
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// A stage-only pipeline used as a stage of another pipeline.
///
/// Each time the parent reaches it, a child run is started from the parent's
/// `(error, value, args, log)` tuple under its own driver. The parent stays
/// suspended until the child completes, and only the child's terminal outcome
/// crosses back.
#[derive(Clone)]
pub struct SubPipeline {
    name: String,
    stages: Vec<Stage>,
    config: EngineConfig,
}

impl SubPipeline {
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn into_stage(self) -> Stage {
        Stage::resumable(self)
    }
}

impl From<SubPipeline> for Stage {
    fn from(sub: SubPipeline) -> Self {
        sub.into_stage()
    }
}

impl Resumable for SubPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&self, call: StageCall, done: Continuation) {
        let run = PipelineRun::from_stage_call(&self.name, &self.stages, call, self.config.trace);
        let driver = Driver::new(run, None, Sink::Continuation(done), self.config.clone());
        let _ = driver.start();
    }
}

impl fmt::Debug for SubPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubPipeline")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{DeferredStage, ImmediateOperation, ManualOperation};
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn recorded(calls: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Stage {
        let calls = Rc::clone(calls);
        Stage::transform(name, move |input| {
            calls.borrow_mut().push(name.to_string());
            Ok(input.value.clone())
        })
    }

    #[test]
    fn test_build_requires_operation() {
        let err = Pipeline::builder("empty").build().unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingOperation {
                pipeline: "empty".to_string()
            }
        );
    }

    #[test]
    fn test_identity_without_stages() {
        let invoker = Pipeline::builder("identity")
            .operation(ImmediateOperation::ok(json!({"raw": [1, 2, 3]})))
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec![]).report().unwrap();

        assert_eq!(report.outcome, Ok(json!({"raw": [1, 2, 3]})));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_all_successful_stages_return_last_value() {
        let invoker = Pipeline::builder("chain")
            .operation(ImmediateOperation::ok(json!(1)))
            .transform("add_one", |input| Ok(json!(input.value.as_i64().unwrap() + 1)))
            .transform("times_ten", |input| Ok(json!(input.value.as_i64().unwrap() * 10)))
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec![]).report().unwrap();

        assert_eq!(report.outcome, Ok(json!(20)));
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_recoverable_failure_feeds_substitute_and_error_to_next_stage() {
        let seen = Rc::new(RefCell::new(None));
        let probe = Rc::clone(&seen);
        let invoker = Pipeline::builder("recover")
            .operation(ImmediateOperation::ok(json!("raw")))
            .transform("patch", |_| Err(OperationError::recoverable("patched", json!("fixed"))))
            .transform("observe", move |input| {
                *probe.borrow_mut() = Some((input.error.cloned(), input.value.clone()));
                Ok(json!(format!("{}!", input.value.as_str().unwrap())))
            })
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec![]).report().unwrap();

        let (error, value) = seen.borrow().clone().unwrap();
        assert_eq!(error.map(|e| e.message), Some("patched".to_string()));
        assert_eq!(value, json!("fixed"));
        assert_eq!(report.outcome, Ok(json!("fixed!")));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics.entries()[0].stage, "patch");
    }

    #[test]
    fn test_error_flag_persists_across_consecutive_recoveries() {
        let flags = Rc::new(RefCell::new(Vec::new()));
        let (first, second) = (Rc::clone(&flags), Rc::clone(&flags));
        let invoker = Pipeline::builder("twice")
            .operation(ImmediateOperation::ok(json!(0)))
            .transform("warn_a", |_| Err(OperationError::recoverable("a", json!(1))))
            .transform("warn_b", move |input| {
                first.borrow_mut().push(input.error.map(|e| e.message.clone()));
                Err(OperationError::recoverable("b", json!(2)))
            })
            .transform("settle", move |input| {
                second.borrow_mut().push(input.error.map(|e| e.message.clone()));
                Ok(input.value.clone())
            })
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec![]).report().unwrap();

        assert_eq!(
            *flags.borrow(),
            vec![Some("a".to_string()), Some("b".to_string())]
        );
        assert_eq!(report.outcome, Ok(json!(2)));
        assert_eq!(report.diagnostics.len(), 2);
    }

    #[test]
    fn test_fatal_failure_stops_the_chain() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let invoker = Pipeline::builder("halt")
            .operation(ImmediateOperation::ok(json!("x")))
            .stage(Stage::transform("warn", |_| {
                Err(OperationError::recoverable("soft", json!("y")))
            }))
            .stage(recorded(&calls, "before"))
            .transform("explode", |_| Err(OperationError::fatal("hard")))
            .stage(recorded(&calls, "after"))
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec![]).report().unwrap();

        assert_eq!(*calls.borrow(), vec!["before".to_string()]);
        assert_eq!(report.outcome, Err(OperationError::fatal("hard")));
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.diagnostics.last().unwrap().stage, "explode");
        assert_eq!(report.diagnostics.entries()[0].stage, "warn");
    }

    #[test]
    fn test_operation_failure_without_stages_completes_immediately() {
        let invoker = Pipeline::builder("missing")
            .operation(ImmediateOperation::err(OperationError::not_found(
                "no such file or directory, 'nope.txt'",
            )))
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec!["nope.txt".into()]).report().unwrap();

        let error = report.outcome.unwrap_err();
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert_eq!(error.message, "no such file or directory, 'nope.txt'");
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_operation_failure_with_stages_is_logged_and_can_be_recovered() {
        let invoker = Pipeline::builder("fallback")
            .operation(ImmediateOperation::err(OperationError::not_found("gone")))
            .transform("default_text", |input| {
                assert!(input.error.is_some());
                Ok(json!("default"))
            })
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec!["a.txt".into()]).report().unwrap();

        assert_eq!(report.outcome, Ok(json!("default")));
        assert_eq!(report.diagnostics.len(), 1);
        let entry = &report.diagnostics.entries()[0];
        assert_eq!(entry.stage, "immediate");
        assert_eq!(entry.args, vec![json!("a.txt")]);
    }

    #[test]
    fn test_concurrent_runs_do_not_share_state() {
        let operation = Rc::new(ManualOperation::new("read"));
        let invoker = Pipeline::builder("shared")
            .shared_operation(operation.clone())
            .transform("warn_if_b", |input| {
                if input.args[0] == json!("b") {
                    Err(OperationError::recoverable("b warns", input.value.clone()))
                } else {
                    Ok(input.value.clone())
                }
            })
            .build()
            .unwrap()
            .invoker();

        let calls_a = Rc::new(RefCell::new(Vec::new()));
        let calls_b = Rc::new(RefCell::new(Vec::new()));
        let run_a = invoker.invoke(vec!["a".into(), recorded(&calls_a, "extra_a").into()]);
        let run_b = invoker.invoke(vec!["b".into(), recorded(&calls_b, "extra_b").into()]);

        assert_eq!(operation.calls(), vec![vec![json!("a")], vec![json!("b")]]);

        // Complete in reverse order.
        operation.complete_last(Ok(json!("B")));
        operation.complete_last(Ok(json!("A")));

        let report_a = run_a.report().unwrap();
        let report_b = run_b.report().unwrap();
        assert_eq!(report_a.outcome, Ok(json!("A")));
        assert!(report_a.diagnostics.is_empty());
        assert_eq!(report_b.diagnostics.len(), 1);
        assert_eq!(report_b.diagnostics.entries()[0].args, vec![json!("b")]);
        assert_eq!(*calls_a.borrow(), vec!["extra_a".to_string()]);
        assert_eq!(*calls_b.borrow(), vec!["extra_b".to_string()]);
        assert_eq!(invoker.pipeline().stages().len(), 1);
    }

    #[test]
    fn test_preprocessor_rewrites_args() {
        let operation = Rc::new(ManualOperation::new("read"));
        let invoker = Pipeline::builder("pre")
            .shared_operation(operation.clone())
            .build()
            .unwrap()
            .invoker()
            .with_preprocessor(Preprocessor::new("append_encoding", |args| {
                let mut args = args.to_vec();
                args.push(json!("utf-8"));
                Ok(args)
            }));

        invoker.invoke(vec!["a.txt".into()]);

        assert_eq!(operation.calls(), vec![vec![json!("a.txt"), json!("utf-8")]]);
    }

    #[test]
    fn test_nested_pipeline_stage_suspends_parent() {
        let deferred = Rc::new(DeferredStage::new("slow"));
        let child = Pipeline::builder("child")
            .transform("child_upper", |input| {
                Ok(json!(input.value.as_str().unwrap().to_uppercase()))
            })
            .stage(Stage::shared(deferred.clone()))
            .build_sub_pipeline();

        let calls = Rc::new(RefCell::new(Vec::new()));
        let invoker = Pipeline::builder("parent")
            .operation(ImmediateOperation::ok(json!("text")))
            .stage(child)
            .stage(recorded(&calls, "after_child"))
            .build()
            .unwrap()
            .invoker();

        let (driver, handle) = invoker.driver(vec![]);

        assert!(!handle.is_complete());
        assert_eq!(driver.state(), crate::engine::RunState::RunningStage(0));
        assert!(calls.borrow().is_empty());
        assert_eq!(deferred.pending_values(), vec![json!("TEXT")]);

        deferred.complete_next(Ok(json!("TEXT, later")));

        assert_eq!(*calls.borrow(), vec!["after_child".to_string()]);
        assert_eq!(handle.report().unwrap().outcome, Ok(json!("TEXT, later")));
    }

    #[test]
    fn test_invoker_as_operation_propagates_recovered_value() {
        let child = Pipeline::builder("child")
            .operation(ImmediateOperation::ok(json!("raw\n\n")))
            .transform("trim", |input| {
                let trimmed = input.value.as_str().unwrap().trim_end().to_string();
                Err(OperationError::recoverable("extra newlines", json!(trimmed)))
            })
            .build()
            .unwrap()
            .invoker();

        let seen = Rc::new(RefCell::new(None));
        let probe = Rc::clone(&seen);
        let parent = Pipeline::builder("parent")
            .operation(child)
            .transform("inspect", move |input| {
                *probe.borrow_mut() = input.error.map(|e| e.message.clone());
                Ok(input.value.clone())
            })
            .build()
            .unwrap()
            .invoker();

        let report = parent.invoke(vec!["a.txt".into()]).report().unwrap();

        assert_eq!(report.outcome, Ok(json!("raw")));
        assert_eq!(*seen.borrow(), Some("extra newlines".to_string()));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics.entries()[0].stage, "child");
    }

    #[test]
    fn test_dropped_handle_still_lets_run_finish() {
        let operation = Rc::new(ManualOperation::new("read"));
        let calls = Rc::new(RefCell::new(Vec::new()));
        let invoker = Pipeline::builder("abandoned")
            .shared_operation(operation.clone())
            .stage(recorded(&calls, "side_effect"))
            .build()
            .unwrap()
            .invoker();

        drop(invoker.invoke(vec![]));
        operation.complete_next(Ok(json!(1)));

        assert_eq!(*calls.borrow(), vec!["side_effect".to_string()]);
    }

    #[tokio::test]
    async fn test_finished_waits_for_late_completion() {
        let operation = Rc::new(ManualOperation::new("read"));
        let invoker = Pipeline::builder("late")
            .shared_operation(operation.clone())
            .build()
            .unwrap()
            .invoker();

        let handle = invoker.invoke(vec![]);
        let local = tokio::task::LocalSet::new();
        let completer = Rc::clone(&operation);
        local.spawn_local(async move {
            tokio::task::yield_now().await;
            completer.complete_next(Ok(json!("late")));
        });

        let report = local.run_until(handle.finished()).await;
        assert_eq!(report.outcome, Ok(json!("late")));
    }

    fn finished_with(outcome: Outcome) -> RunReport {
        RunReport {
            outcome,
            diagnostics: DiagnosticLog::new(),
        }
    }

    #[test]
    fn test_exit_status_all_ok() {
        let reports = vec![finished_with(Ok(json!("a"))), finished_with(Ok(json!("b")))];
        assert_eq!(exit_status(&reports), 0);
        assert_eq!(exit_status(&[]), 0);
    }

    #[test]
    fn test_exit_status_not_found_wins() {
        let reports = vec![
            finished_with(Err(OperationError::fatal("broken"))),
            finished_with(Err(OperationError::not_found("Failed to find file \"a.txt\"."))),
            finished_with(Ok(json!("fine"))),
        ];
        assert_eq!(exit_status(&reports), NOT_FOUND_EXIT_CODE);
    }

    #[test]
    fn test_exit_status_other_fatal_failure() {
        let reports = vec![
            finished_with(Ok(json!("fine"))),
            finished_with(Err(OperationError::new(ErrorKind::PermissionDenied, "locked"))),
        ];
        assert_eq!(exit_status(&reports), FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_exit_status_ignores_recoverable_terminal_errors() {
        let recovered = finished_with(Err(OperationError::recoverable("extra newlines", json!("hello"))));
        assert!(recovered.unrecoverable_error().is_none());
        assert_eq!(exit_status(&[recovered, finished_with(Ok(json!("fine")))]), 0);
    }

    #[test]
    fn test_exit_status_when_last_stage_recovers() {
        // A recoverable failure in the last stage survives as the terminal error.
        let invoker = Pipeline::builder("noisy")
            .operation(ImmediateOperation::ok(json!("hello\n\n")))
            .transform("trim", |input| {
                let text = input.value.as_str().unwrap_or_default();
                Err(OperationError::recoverable("trimmed", json!(text.trim_end())))
            })
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec![]).report().unwrap();

        assert!(report.outcome.is_err());
        assert_eq!(exit_status(&[report]), 0);
    }
}
