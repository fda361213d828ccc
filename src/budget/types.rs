//! Budget policy definitions

use serde::{Deserialize, Serialize};

/// Weighted share below which a priority step is escalated (milliseconds)
pub const PRIORITY_FLOOR_MS: i64 = 30;

/// Policy applied when deriving child budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetPolicy {
    /// Priority steps whose weighted share is below this value receive the
    /// whole remaining parent budget (default: 30)
    pub priority_floor_ms: i64,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            priority_floor_ms: PRIORITY_FLOOR_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_floor() {
        assert_eq!(BudgetPolicy::default().priority_floor_ms, 30);
    }

    #[test]
    fn test_missing_floor_uses_default() {
        let policy: BudgetPolicy = toml::from_str("").unwrap();
        assert_eq!(policy, BudgetPolicy::default());
    }
}
