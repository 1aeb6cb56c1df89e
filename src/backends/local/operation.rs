// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Adapters that turn plain closures into [`Operation`]s.

use std::future::Future;

use serde_json::Value;

use crate::engine::Outcome;
use crate::traits::{Continuation, Operation};

/// Operation backed by a callback-style closure. The closure owns the
/// continuation and may complete it immediately or hand it on.
pub struct FnOperation<F> {
    name: String,
    func: F,
}

impl<F> FnOperation<F>
where
    F: Fn(Vec<Value>, Continuation),
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            name: name.to_string(),
            func,
        }
    }
}

impl<F> Operation for FnOperation<F>
where
    F: Fn(Vec<Value>, Continuation),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: Vec<Value>, done: Continuation) {
        (self.func)(args, done)
    }
}

/// Operation backed by a future factory.
///
/// Each call spawns the future on the current `LocalSet` and completes the
/// continuation with its output, so `call` always returns before the run
/// resumes. Calling it outside a `LocalSet` panics.
pub struct AsyncOperation<F> {
    name: String,
    func: F,
}

impl<F, Fut> AsyncOperation<F>
where
    F: Fn(Vec<Value>) -> Fut,
    Fut: Future<Output = Outcome> + 'static,
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            name: name.to_string(),
            func,
        }
    }
}

impl<F, Fut> Operation for AsyncOperation<F>
where
    F: Fn(Vec<Value>) -> Fut,
    Fut: Future<Output = Outcome> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: Vec<Value>, done: Continuation) {
        let pending = (self.func)(args);
        tokio::task::spawn_local(async move {
            done.complete(pending.await);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Pipeline;
    use crate::errors::OperationError;
    use serde_json::json;
    use tokio::task::LocalSet;

    #[test]
    fn test_fn_operation_completes_synchronously() {
        let invoker = Pipeline::builder("echo")
            .operation(FnOperation::new("echo", |args, done: Continuation| {
                done.succeed(json!(args))
            }))
            .build()
            .unwrap()
            .invoker();

        let report = invoker.invoke(vec!["a".into(), "b".into()]).report().unwrap();
        assert_eq!(report.outcome, Ok(json!(["a", "b"])));
    }

    #[tokio::test]
    async fn test_async_operation_resumes_from_spawned_task() {
        let invoker = Pipeline::builder("later")
            .operation(AsyncOperation::new("sleepy", |args: Vec<Value>| async move {
                tokio::task::yield_now().await;
                match args.first() {
                    Some(value) => Ok(value.clone()),
                    None => Err(OperationError::misuse("nothing to return")),
                }
            }))
            .transform("wrap", |input| Ok(json!({ "got": input.value })))
            .build()
            .unwrap()
            .invoker();

        let local = LocalSet::new();
        let report = local
            .run_until(async {
                let handle = invoker.invoke(vec![json!(5).into()]);
                assert!(!handle.is_complete());
                handle.finished().await
            })
            .await;

        assert_eq!(report.outcome, Ok(json!({ "got": 5 })));
    }
}
