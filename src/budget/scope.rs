//! Scoped child budgets
//!
//! A derived budget is paired with a guard that is counted as open in a
//! [`ScopeLedger`] until it is dropped. Dropping covers every exit path of a
//! step, including a step future abandoned when the root budget expires.

use crate::budget::deadline::Budget;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Counts derived budget scopes that have not been released yet
#[derive(Debug, Clone, Default)]
pub struct ScopeLedger {
    open: Arc<AtomicUsize>,
}

impl ScopeLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `budget` as an open scope
    pub fn open(&self, budget: Budget) -> BudgetScope {
        let open = self.open.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(open, "budget scope opened");
        BudgetScope {
            budget,
            ledger: self.clone(),
        }
    }

    /// Number of scopes currently open
    pub fn open_scopes(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }
}

/// A derived budget that stays registered until dropped
#[derive(Debug)]
pub struct BudgetScope {
    budget: Budget,
    ledger: ScopeLedger,
}

impl BudgetScope {
    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn remaining_millis(&self) -> i64 {
        self.budget.remaining_millis()
    }

    /// Release the scope explicitly
    pub fn release(self) {}
}

impl Drop for BudgetScope {
    fn drop(&mut self) {
        let open = self.ledger.open.fetch_sub(1, Ordering::AcqRel) - 1;
        trace!(open, "budget scope released");
    }
}
