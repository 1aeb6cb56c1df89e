// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Diagnostic log accumulated by a pipeline run.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::errors::OperationError;

/// One failure recorded during a run: which stage (or operation) failed,
/// the arguments of the run, and the error it raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEntry {
    pub stage: String,
    pub args: Vec<Value>,
    pub error: OperationError,
}

impl fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.stage,
            Value::Array(self.args.clone()),
            self.error
        )
    }
}

/// Ordered failures of one run. Never shared between runs except through an
/// osculator, which keeps its own merged copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiagnosticLog(Vec<DiagnosticEntry>);

impl DiagnosticLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, entry: DiagnosticEntry) {
        self.0.push(entry);
    }

    pub fn record(&mut self, stage: &str, args: &[Value], error: &OperationError) {
        self.push(DiagnosticEntry {
            stage: stage.to_string(),
            args: args.to_vec(),
            error: error.clone(),
        });
    }

    /// Appends every entry of `other`, preserving order.
    pub fn extend_from(&mut self, other: &DiagnosticLog) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&DiagnosticEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.0.iter()
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.0
    }
}

impl From<Vec<DiagnosticEntry>> for DiagnosticLog {
    fn from(entries: Vec<DiagnosticEntry>) -> Self {
        Self(entries)
    }
}

/// First `max_lines` lines of `message`, with a trailing ellipsis when cut.
pub fn summarize(message: &str, max_lines: usize) -> String {
    let mut lines = message.lines();
    let kept: Vec<&str> = lines.by_ref().take(max_lines.max(1)).collect();
    let mut summary = kept.join("\n");
    if lines.next().is_some() {
        summary.push_str(" ...");
    }
    summary
}
