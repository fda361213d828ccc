//! Deadline arithmetic for timeout budgets
//! Root budgets, weighted child budgets and priority escalation

pub mod deadline;
pub mod scope;
pub mod types;

pub use deadline::{derive_budget, is_escalated, remaining_millis, weighted_allotment, Budget};
pub use scope::{BudgetScope, ScopeLedger};
pub use types::{BudgetPolicy, PRIORITY_FLOOR_MS};
