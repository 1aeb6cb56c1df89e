// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{StageInput, Transform};
use crate::errors::{ErrorKind, OperationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    Upper,
    Lower,
}

/// Renders a text value in a single case. Non-text input is fatal.
pub struct ChangeCase {
    case: Case,
}

impl ChangeCase {
    pub fn new(case: Case) -> Self {
        Self { case }
    }

    pub fn upper() -> Self {
        Self::new(Case::Upper)
    }

    pub fn lower() -> Self {
        Self::new(Case::Lower)
    }

    pub fn name(&self) -> &'static str {
        match self.case {
            Case::Upper => "change_case_upper",
            Case::Lower => "change_case_lower",
        }
    }

    pub fn apply(&self, input: &StageInput<'_>) -> Result<Value, OperationError> {
        let text = input.value.as_str().ok_or_else(|| {
            OperationError::new(
                ErrorKind::InvalidInput,
                format!("stage \"{}\" cannot change the case of {}", self.name(), input.value),
            )
        })?;

        let rendered = match self.case {
            Case::Upper => text.to_uppercase(),
            Case::Lower => text.to_lowercase(),
        };
        Ok(Value::String(rendered))
    }

    pub fn transform(self) -> Transform {
        let name = self.name();
        Transform::new(name, move |input| self.apply(input))
    }
}
