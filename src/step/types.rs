//! Step configuration and report row types

use crate::errors::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Configuration of a single step, as written in a scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StepSpec {
    /// Occupies a literal duration regardless of the parent budget
    Fixed { name: String, timeout_ms: u64 },

    /// Occupies a fraction of whatever the parent budget has left
    Weighted {
        name: String,
        weight: f64,
        #[serde(default)]
        priority: bool,
    },
}

impl StepSpec {
    pub fn fixed(name: impl Into<String>, timeout_ms: u64) -> Self {
        StepSpec::Fixed {
            name: name.into(),
            timeout_ms,
        }
    }

    pub fn weighted(name: impl Into<String>, weight: f64, priority: bool) -> Self {
        StepSpec::Weighted {
            name: name.into(),
            weight,
            priority,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StepSpec::Fixed { name, .. } | StepSpec::Weighted { name, .. } => name,
        }
    }

    /// Reject names and weights that would produce meaningless budgets
    pub fn validate(&self) -> Result<()> {
        if self.name().trim().is_empty() {
            return Err(SimError::invalid_config("<unnamed step>", "step name must not be empty"));
        }

        if let StepSpec::Weighted { name, weight, .. } = self {
            if !weight.is_finite() || *weight <= 0.0 || *weight > 1.0 {
                return Err(SimError::invalid_config(
                    name.as_str(),
                    format!("weight must be in (0, 1], got {}", weight),
                ));
            }
        }

        Ok(())
    }
}

/// One line of a run report, emitted when a step completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Step name
    pub step: String,

    /// Literal timeout for fixed steps, derived allotment for weighted steps.
    /// Zero or negative when the parent was already exhausted.
    pub allotted_ms: i64,

    /// Parent budget left at the moment the step completed
    pub remaining_ms: i64,
}
