// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::Output;
use crate::engine::{StageInput, Transform};
use crate::errors::OperationError;

pub const DONE_MESSAGE: &str = "Done successfully.";
pub const DONE_WITH_WARNINGS_MESSAGE: &str =
    "Done, but stumbled upon recoverable errors. See the warnings.";

/// Closing stage: one line saying whether the run logged any recoverable
/// failure. The entries themselves are left to the traced diagnostics.
pub struct ReportEnd {
    output: Output,
}

impl ReportEnd {
    pub const NAME: &'static str = "report_end";

    pub fn new(output: Output) -> Self {
        Self { output }
    }

    pub fn apply(&self, input: &StageInput<'_>) -> Result<Value, OperationError> {
        let headline = if input.log.is_empty() {
            DONE_MESSAGE
        } else {
            DONE_WITH_WARNINGS_MESSAGE
        };
        self.output
            .write_line(headline)
            .map_err(|e| OperationError::from_io(&e, Self::NAME))?;
        Ok(input.value.clone())
    }

    pub fn transform(self) -> Transform {
        Transform::new(Self::NAME, move |input| self.apply(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DiagnosticLog;
    use serde_json::json;

    #[test]
    fn test_clean_run() {
        let output = Output::capture();
        let log = DiagnosticLog::new();
        ReportEnd::new(output.clone())
            .apply(&StageInput {
                error: None,
                value: &json!("x"),
                args: &[],
                log: &log,
            })
            .unwrap();
        assert_eq!(output.captured(), "Done successfully.\n");
    }

    #[test]
    fn test_run_with_warnings_prints_headline_only() {
        let output = Output::capture();
        let mut log = DiagnosticLog::new();
        log.record(
            "trim_eof",
            &[json!("a.txt")],
            &OperationError::recoverable("extra newlines", json!("x")),
        );

        let out = ReportEnd::new(output.clone()).apply(&StageInput {
            error: None,
            value: &json!("x"),
            args: &[],
            log: &log,
        });

        assert_eq!(out, Ok(json!("x")));
        assert_eq!(output.captured(), format!("{}\n", DONE_WITH_WARNINGS_MESSAGE));
    }
}
