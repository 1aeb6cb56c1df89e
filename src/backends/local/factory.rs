// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::stages::*;
use crate::engine::Stage;
use crate::errors::PipelineError;

/// Factory for the built-in local stages, addressed by name from configuration.
pub struct LocalStageFactory;

impl LocalStageFactory {
    /// Create a stage that prints to stdout.
    ///
    /// - "check_read" -> CheckRead
    /// - "trim_eof" -> TrimEof
    /// - "change_case_upper" / "change_case_lower" -> ChangeCase
    /// - "print" -> Print
    /// - "report_end" -> ReportEnd
    pub fn create(name: &str) -> Result<Stage, PipelineError> {
        Self::create_with_output(name, &Output::Stdout)
    }

    /// Create a stage whose printed lines go to `output`.
    pub fn create_with_output(name: &str, output: &Output) -> Result<Stage, PipelineError> {
        let transform = match name {
            CheckRead::NAME => CheckRead::transform(),
            TrimEof::NAME => TrimEof::transform(),
            "change_case_upper" => ChangeCase::upper().transform(),
            "change_case_lower" => ChangeCase::lower().transform(),
            Print::NAME => Print::new(output.clone()).transform(),
            ReportEnd::NAME => ReportEnd::new(output.clone()).transform(),
            _ => return Err(PipelineError::UnknownStage(name.to_string())),
        };
        Ok(Stage::from(transform))
    }

    pub fn list_available() -> Vec<&'static str> {
        vec![
            CheckRead::NAME,
            TrimEof::NAME,
            "change_case_upper",
            "change_case_lower",
            Print::NAME,
            ReportEnd::NAME,
        ]
    }

    pub fn is_available(name: &str) -> bool {
        Self::list_available().contains(&name)
    }
}
