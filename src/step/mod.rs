//! Simulated steps
//!
//! A step either burns a literal duration (fixed) or a slice of its parent's
//! remaining budget (weighted). Both variants simulate worst-case consumption:
//! the whole allotment is slept away before the step reports.

pub mod types;

pub use types::{ReportRow, StepSpec};

use crate::budget::{Budget, BudgetPolicy, ScopeLedger};
use crate::errors::Result;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Shared inputs for running steps inside one sequencer
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    pub policy: BudgetPolicy,
    pub ledger: ScopeLedger,
}

/// Step that occupies a literal duration
#[derive(Debug, Clone)]
pub struct FixedStep {
    name: String,
    timeout_ms: u64,
    executed: bool,
}

/// Step that occupies a weighted share of the parent budget
#[derive(Debug, Clone)]
pub struct WeightedStep {
    name: String,
    weight: f64,
    priority: bool,
    executed: bool,
}

/// A configured step, ready to run once
#[derive(Debug, Clone)]
pub enum Step {
    Fixed(FixedStep),
    Weighted(WeightedStep),
}

impl Step {
    /// Build a step from validated configuration
    pub fn from_spec(spec: StepSpec) -> Result<Self> {
        spec.validate()?;
        Ok(match spec {
            StepSpec::Fixed { name, timeout_ms } => Step::Fixed(FixedStep {
                name,
                timeout_ms,
                executed: false,
            }),
            StepSpec::Weighted {
                name,
                weight,
                priority,
            } => Step::Weighted(WeightedStep {
                name,
                weight,
                priority,
                executed: false,
            }),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Step::Fixed(step) => &step.name,
            Step::Weighted(step) => &step.name,
        }
    }

    /// Check if the step ran to completion
    pub fn is_executed(&self) -> bool {
        match self {
            Step::Fixed(step) => step.executed,
            Step::Weighted(step) => step.executed,
        }
    }

    /// Run the step under `parent` and report what it consumed
    pub async fn run(&mut self, parent: &Budget, ctx: &StepContext) -> ReportRow {
        let row = match self {
            Step::Fixed(step) => step.run(parent).await,
            Step::Weighted(step) => step.run(parent, ctx).await,
        };
        debug!(
            step = %row.step,
            allotted_ms = row.allotted_ms,
            remaining_ms = row.remaining_ms,
            "step completed"
        );
        row
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Fixed(step) => write!(f, "{} (fixed {}ms)", step.name, step.timeout_ms),
            Step::Weighted(step) if step.priority => {
                write!(f, "{} (weighted {}, priority)", step.name, step.weight)
            }
            Step::Weighted(step) => write!(f, "{} (weighted {})", step.name, step.weight),
        }
    }
}

impl FixedStep {
    async fn run(&mut self, parent: &Budget) -> ReportRow {
        // not clamped to the parent budget
        sleep(Duration::from_millis(self.timeout_ms)).await;
        self.executed = true;

        ReportRow {
            step: self.name.clone(),
            allotted_ms: i64::try_from(self.timeout_ms).unwrap_or(i64::MAX),
            remaining_ms: parent.remaining_millis(),
        }
    }
}

impl WeightedStep {
    async fn run(&mut self, parent: &Budget, ctx: &StepContext) -> ReportRow {
        let scope = parent.derive_scope(self.weight, self.priority, &ctx.policy, &ctx.ledger);
        let allotted_ms = scope.remaining_millis();

        if allotted_ms > 0 {
            sleep(Duration::from_millis(allotted_ms.unsigned_abs())).await;
        }
        scope.release();
        self.executed = true;

        ReportRow {
            step: self.name.clone(),
            allotted_ms,
            remaining_ms: parent.remaining_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SimError;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_step_consumes_literal_timeout() {
        let parent = Budget::from_now(600);
        let mut step = Step::from_spec(StepSpec::fixed("auth", 20)).unwrap();
        assert!(!step.is_executed());

        let row = step.run(&parent, &StepContext::default()).await;

        assert!(step.is_executed());
        assert_eq!(row.step, "auth");
        assert_eq!(row.allotted_ms, 20);
        assert_eq!(row.remaining_ms, 580);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_step_overruns_parent() {
        let parent = Budget::from_now(50);
        let mut step = Step::from_spec(StepSpec::fixed("slow", 100)).unwrap();

        let row = step.run(&parent, &StepContext::default()).await;

        assert_eq!(row.allotted_ms, 100);
        assert_eq!(row.remaining_ms, -50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_weighted_step_consumes_share() {
        let parent = Budget::from_now(580);
        let ctx = StepContext::default();
        let mut step = Step::from_spec(StepSpec::weighted("rank", 0.5, true)).unwrap();

        let row = step.run(&parent, &ctx).await;

        assert!(step.is_executed());
        assert_eq!(row.allotted_ms, 290);
        assert_eq!(row.remaining_ms, 290);
        assert_eq!(ctx.ledger.open_scopes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_priority_step_takes_everything_below_floor() {
        let parent = Budget::from_now(40);
        let mut step = Step::from_spec(StepSpec::weighted("rank", 0.5, true)).unwrap();

        let row = step.run(&parent, &StepContext::default()).await;

        assert_eq!(row.allotted_ms, 40);
        assert_eq!(row.remaining_ms, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_weighted_step_on_exhausted_parent() {
        let parent = Budget::from_now(10);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let mut step = Step::from_spec(StepSpec::weighted("late", 0.5, false)).unwrap();

        let row = step.run(&parent, &StepContext::default()).await;

        assert!(step.is_executed());
        assert!(row.allotted_ms <= 0);
        assert_eq!(row.remaining_ms, -20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_step_releases_scope() {
        let parent = Budget::from_now(1000);
        let ctx = StepContext::default();
        let mut step = Step::from_spec(StepSpec::weighted("rank", 1.0, false)).unwrap();

        tokio::select! {
            _ = step.run(&parent, &ctx) => panic!("step should not finish first"),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }

        assert!(!step.is_executed());
        assert_eq!(ctx.ledger.open_scopes(), 0);
    }

    #[test]
    fn test_from_spec_rejects_invalid_weight() {
        let err = Step::from_spec(StepSpec::weighted("rank", 0.0, false)).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { .. }));
    }

    #[test]
    fn test_display() {
        let fixed = Step::from_spec(StepSpec::fixed("auth", 20)).unwrap();
        let weighted = Step::from_spec(StepSpec::weighted("rank", 0.5, true)).unwrap();
        assert_eq!(fixed.to_string(), "auth (fixed 20ms)");
        assert_eq!(weighted.to_string(), "rank (weighted 0.5, priority)");
    }
}
