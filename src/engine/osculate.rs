// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Osculation: a rendezvous where independent pipelines share their logs.
//!
//! An [`Osculator`] is registered as a stage in several pipelines. Each time
//! any of them reaches it, the incoming run's diagnostic log is appended to
//! the osculator's running log and the next merge stage is applied with that
//! merged log. Merge stages therefore observe the failures of every pipeline
//! that passed through before them, without the pipelines being flattened
//! into one stage list.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{DiagnosticLog, Outcome, Stage, StageCall, StageInput, Transform};
use crate::errors::{OperationError, PipelineError};
use crate::observability::messages::stage::OsculationMerged;
use crate::observability::messages::StructuredLog;
use crate::traits::{Continuation, Resumable};

#[derive(Debug, Default)]
struct Rendezvous {
    next: usize,
    log: DiagnosticLog,
}

#[derive(Debug)]
pub struct Osculator {
    name: String,
    merges: Vec<Transform>,
    rendezvous: RefCell<Rendezvous>,
}

impl Osculator {
    /// One merge stage is consumed per step, in order.
    pub fn new(name: &str, merges: Vec<Transform>) -> Result<Rc<Self>, PipelineError> {
        if merges.is_empty() {
            return Err(PipelineError::EmptyOsculation {
                osculator: name.to_string(),
            });
        }
        Ok(Rc::new(Self {
            name: name.to_string(),
            merges,
            rendezvous: RefCell::new(Rendezvous::default()),
        }))
    }

    /// Stage handle to register in a pipeline. All handles share this
    /// osculator's state.
    pub fn stage(self: &Rc<Self>) -> Stage {
        Stage::shared(Rc::clone(self) as Rc<dyn Resumable>)
    }

    pub fn merged_log(&self) -> DiagnosticLog {
        self.rendezvous.borrow().log.clone()
    }

    pub fn remaining(&self) -> usize {
        self.merges.len() - self.rendezvous.borrow().next
    }

    fn step(&self, call: StageCall) -> Outcome {
        let (index, merged) = {
            let mut rendezvous = self.rendezvous.borrow_mut();
            if rendezvous.next >= self.merges.len() {
                let error = PipelineError::OsculationExhausted {
                    osculator: self.name.clone(),
                    merge_stages: self.merges.len(),
                };
                return Err(OperationError::misuse(error.to_string()));
            }
            rendezvous.log.extend_from(&call.log);
            let index = rendezvous.next;
            rendezvous.next += 1;
            (index, rendezvous.log.clone())
        };

        OsculationMerged {
            osculator: &self.name,
            step: index,
            entries: merged.len(),
        }
        .log();

        self.merges[index].apply(&StageInput {
            error: call.error.as_ref(),
            value: &call.value,
            args: &call.args,
            log: &merged,
        })
    }
}

impl Resumable for Osculator {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&self, call: StageCall, done: Continuation) {
        done.complete(self.step(call));
    }
}
