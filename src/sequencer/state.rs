//! Sequencer lifecycle state machine
//!
//! Transitions:
//! 1. Pending   → Running   (on: Start)
//! 2. Running   → Completed (on: AllStepsFinished)
//! 3. Running   → Expired   (on: BudgetExpired)
//! 4. Unconfigured | Pending | Completed | Expired → Pending (on: Reconfigure)
//!
//! Anything else is rejected. A new sequencer cannot start before its first
//! configuration, and a finished one cannot start again until reconfigured.

use crate::errors::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Sequencer lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequencerState {
    /// Created, no steps configured yet
    Unconfigured,

    /// Configured, not started
    Pending,

    /// Steps are running under the root budget
    Running,

    /// Every step finished before the root budget expired (terminal)
    Completed,

    /// The root budget expired first (terminal)
    Expired,
}

/// Events that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    Start,
    AllStepsFinished,
    BudgetExpired,
    Reconfigure,
}

impl SequencerEvent {
    /// State this event leads to when accepted
    pub fn target(&self) -> SequencerState {
        match self {
            SequencerEvent::Start => SequencerState::Running,
            SequencerEvent::AllStepsFinished => SequencerState::Completed,
            SequencerEvent::BudgetExpired => SequencerState::Expired,
            SequencerEvent::Reconfigure => SequencerState::Pending,
        }
    }
}

impl SequencerState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, SequencerState::Completed | SequencerState::Expired)
    }

    /// Attempt a transition
    pub fn transition(&self, event: SequencerEvent) -> Result<SequencerState> {
        use SequencerEvent::*;
        use SequencerState::*;

        let next_state = match (self, event) {
            (Pending, Start) => Running,
            (Running, AllStepsFinished) => Completed,
            (Running, BudgetExpired) => Expired,
            (Unconfigured | Pending | Completed | Expired, Reconfigure) => Pending,

            (from, event) => {
                let reason = match (from, event) {
                    (Unconfigured, Start) => "configure the steps before running".to_string(),
                    (Completed | Expired, Start) => {
                        "a finished sequencer must be reconfigured before it runs again".to_string()
                    }
                    _ => format!("{:?} is not accepted here", event),
                };
                return Err(SimError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("{:?}", event.target()),
                    reason,
                });
            }
        };

        Ok(next_state)
    }
}
