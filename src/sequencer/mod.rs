//! Sequencer: runs an ordered list of steps under one root budget
//!
//! # Race
//!
//! Each run polls two activities in a single `tokio::select!`:
//!
//! - the worker, which runs the steps strictly one after another and yields
//!   the root budget left after the last one;
//! - a timer waiting for the root deadline.
//!
//! Whichever resolves first decides the outcome. The losing future is dropped
//! and never consulted again, so an outcome is reported exactly once. The
//! worker holds the only mutable borrow of the steps and rows; `executed`
//! flags are read only after the select has resolved.

pub mod state;
pub mod types;

pub use state::{SequencerEvent, SequencerState};
pub use types::{RunOutcome, RunReport};

use crate::budget::{Budget, BudgetPolicy, ScopeLedger};
use crate::errors::{Result, SimError};
use crate::step::{ReportRow, Step, StepContext, StepSpec};
use chrono::Utc;
use tokio::time::sleep_until;
use tracing::{info, warn};

/// Runs configured steps against a root timeout budget
#[derive(Debug)]
pub struct Sequencer {
    name: String,
    timeout_ms: u64,
    steps: Vec<Step>,
    state: SequencerState,
    ctx: StepContext,
}

impl Sequencer {
    /// Create a sequencer with a root timeout in milliseconds
    pub fn new(name: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SimError::invalid_config("<unnamed simulator>", "simulator name must not be empty"));
        }
        if timeout_ms == 0 {
            return Err(SimError::invalid_config(name, "root timeout must be greater than 0 ms"));
        }

        Ok(Self {
            name,
            timeout_ms,
            steps: Vec::new(),
            state: SequencerState::Unconfigured,
            ctx: StepContext::default(),
        })
    }

    /// Use a non-default budget policy
    pub fn with_policy(mut self, policy: BudgetPolicy) -> Self {
        self.ctx.policy = policy;
        self
    }

    /// Replace the step list and return to `Pending`
    ///
    /// Every step is validated before anything is replaced, so a rejected
    /// configuration leaves the sequencer untouched.
    pub fn configure(&mut self, specs: Vec<StepSpec>) -> Result<()> {
        let next_state = self.state.transition(SequencerEvent::Reconfigure)?;
        let steps = specs
            .into_iter()
            .map(Step::from_spec)
            .collect::<Result<Vec<_>>>()?;

        self.steps = steps;
        self.state = next_state;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn policy(&self) -> BudgetPolicy {
        self.ctx.policy
    }

    /// Scope ledger shared by every weighted step of this sequencer
    pub fn ledger(&self) -> &ScopeLedger {
        &self.ctx.ledger
    }

    /// Run the configured steps once under a fresh root budget
    pub async fn run(&mut self) -> Result<RunReport> {
        self.state = self.state.transition(SequencerEvent::Start)?;

        let started_at = Utc::now();
        let root = Budget::from_now(self.timeout_ms);
        info!(
            simulator = %self.name,
            timeout_ms = self.timeout_ms,
            steps = self.steps.len(),
            "run started"
        );

        let mut rows = Vec::with_capacity(self.steps.len());
        let finished = tokio::select! {
            remaining_ms = run_steps(&mut self.steps, &root, &self.ctx, &mut rows) => Some(remaining_ms),
            _ = sleep_until(root.deadline()) => None,
        };

        let (outcome, event) = match finished {
            Some(remaining_ms) => {
                info!(simulator = %self.name, remaining_ms, "run completed");
                (RunOutcome::Completed { remaining_ms }, SequencerEvent::AllStepsFinished)
            }
            None => {
                let unexecuted = self.unexecuted();
                warn!(simulator = %self.name, ?unexecuted, "root budget expired");
                (RunOutcome::Expired { unexecuted }, SequencerEvent::BudgetExpired)
            }
        };
        self.state = self.state.transition(event)?;

        Ok(RunReport {
            simulator: self.name.clone(),
            root_timeout_ms: self.timeout_ms,
            started_at,
            rows,
            outcome,
        })
    }

    fn unexecuted(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|step| !step.is_executed())
            .map(|step| step.name().to_string())
            .collect()
    }
}

async fn run_steps(
    steps: &mut [Step],
    root: &Budget,
    ctx: &StepContext,
    rows: &mut Vec<ReportRow>,
) -> i64 {
    for step in steps.iter_mut() {
        rows.push(step.run(root, ctx).await);
    }
    root.remaining_millis()
}
