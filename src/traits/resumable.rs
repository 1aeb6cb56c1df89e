// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::StageCall;
use crate::traits::Continuation;

/// A stage that may suspend the run it belongs to.
///
/// The parent run hands over its `(error, value, args, log)` tuple and stays
/// suspended until `done` is completed with the stage's terminal outcome.
pub trait Resumable {
    fn name(&self) -> &str;

    fn resume(&self, call: StageCall, done: Continuation);
}
