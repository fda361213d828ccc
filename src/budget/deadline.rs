//! Budget instants and the arithmetic that subdivides them
//!
//! A budget is an instant on the monotonic clock after which no more work
//! should happen. Child budgets are carved out of the time a parent has left:
//!
//! - Share:      allotted = trunc(parent_remaining × weight)
//! - Escalation: priority ∧ allotted < floor  ⟹  allotted = parent_remaining
//! - Containment: child ≤ parent, always
//!
//! Escalation compares the weighted share with the floor, not the parent's
//! remaining time, so a priority step with a share above the floor is never
//! escalated even when the parent has plenty left.

use crate::budget::scope::{BudgetScope, ScopeLedger};
use crate::budget::types::BudgetPolicy;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// An absolute deadline on the monotonic clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Budget {
    deadline: Instant,
}

impl Budget {
    /// Budget expiring `timeout_ms` from now
    pub fn from_now(timeout_ms: u64) -> Self {
        Self::starting_at(Instant::now(), timeout_ms)
    }

    /// Budget expiring `timeout_ms` after `start`
    pub fn starting_at(start: Instant, timeout_ms: u64) -> Self {
        Self {
            deadline: start + Duration::from_millis(timeout_ms),
        }
    }

    /// The instant this budget expires
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Milliseconds left as of now (negative once expired)
    pub fn remaining_millis(&self) -> i64 {
        self.remaining_millis_at(Instant::now())
    }

    /// Milliseconds left as of `now`, truncated toward zero
    pub fn remaining_millis_at(&self, now: Instant) -> i64 {
        match self.deadline.checked_duration_since(now) {
            Some(left) => to_millis(left),
            None => -to_millis(now.duration_since(self.deadline)),
        }
    }

    /// Check if the deadline has passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Derive a child budget as of now
    pub fn derive(&self, weight: f64, priority: bool, policy: &BudgetPolicy) -> Budget {
        self.derive_at(Instant::now(), weight, priority, policy)
    }

    /// Derive a child budget as of `now`
    pub fn derive_at(
        &self,
        now: Instant,
        weight: f64,
        priority: bool,
        policy: &BudgetPolicy,
    ) -> Budget {
        let parent_remaining = self.remaining_millis_at(now);
        let floor_ms = policy.priority_floor_ms;
        let allotted = weighted_allotment(parent_remaining, weight, priority, floor_ms);

        trace!(
            parent_remaining,
            weight,
            priority,
            allotted,
            escalated = is_escalated(parent_remaining, weight, priority, floor_ms),
            "derived child budget"
        );

        let candidate = offset(now, allotted);
        Budget {
            deadline: candidate.min(self.deadline),
        }
    }

    /// Derive a child budget and register it as an open scope in `ledger`
    ///
    /// The scope is released when the returned guard is dropped.
    pub fn derive_scope(
        &self,
        weight: f64,
        priority: bool,
        policy: &BudgetPolicy,
        ledger: &ScopeLedger,
    ) -> BudgetScope {
        ledger.open(self.derive(weight, priority, policy))
    }
}

/// Milliseconds left on `budget` as of now
pub fn remaining_millis(budget: &Budget) -> i64 {
    budget.remaining_millis()
}

/// Derive a child of `parent` as of now
pub fn derive_budget(parent: &Budget, weight: f64, priority: bool, policy: &BudgetPolicy) -> Budget {
    parent.derive(weight, priority, policy)
}

/// Milliseconds a weighted step is allotted out of `parent_remaining`
///
/// The fractional part of the share is truncated toward zero. A priority
/// step whose share falls below `floor_ms` is granted all of
/// `parent_remaining` instead.
pub fn weighted_allotment(parent_remaining: i64, weight: f64, priority: bool, floor_ms: i64) -> i64 {
    if is_escalated(parent_remaining, weight, priority, floor_ms) {
        parent_remaining
    } else {
        share_of(parent_remaining, weight)
    }
}

/// Check if a priority step's share falls below the floor and is overridden
pub fn is_escalated(parent_remaining: i64, weight: f64, priority: bool, floor_ms: i64) -> bool {
    priority && share_of(parent_remaining, weight) < floor_ms
}

fn share_of(parent_remaining: i64, weight: f64) -> i64 {
    (parent_remaining as f64 * weight).trunc() as i64
}

fn to_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

fn offset(now: Instant, millis: i64) -> Instant {
    let magnitude = Duration::from_millis(millis.unsigned_abs());
    if millis >= 0 {
        now + magnitude
    } else {
        // caller takes min() with the parent, which is already in the past
        now.checked_sub(magnitude).unwrap_or(now)
    }
}
