//! budgetsim - Timeout budget simulator
//!
//! Models how a fixed root timeout is divided among sequential steps.
//!
//! # Architecture
//!
//! - **budget**: deadline arithmetic, weighted derivation, priority escalation
//! - **step**: fixed and weighted step variants
//! - **sequencer**: runs steps in order and races them against the root budget
//! - **report**: table and JSON rendering of finished runs
//! - **cli** / **telemetry** / **execution**: the command-line surface

pub mod errors;
pub mod budget;
pub mod step;
pub mod sequencer;
pub mod report;

pub use errors::{Result, SimError};
pub use budget::{Budget, BudgetPolicy};
pub use sequencer::{RunOutcome, RunReport, Sequencer, SequencerState};
pub use step::{ReportRow, Step, StepSpec};

pub mod cli;
pub mod telemetry;

// Shared run loop for the binary and integration tests
pub mod execution;
