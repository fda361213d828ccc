//! Run report types

use crate::step::ReportRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RunOutcome {
    /// All steps finished; root budget left when the last one did
    Completed { remaining_ms: i64 },

    /// Root budget expired; steps not marked executed, in sequence order
    Expired { unexecuted: Vec<String> },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Everything a reporter needs to render one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub simulator: String,
    pub root_timeout_ms: u64,
    pub started_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    pub outcome: RunOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json_shape() {
        let completed = serde_json::to_value(RunOutcome::Completed { remaining_ms: 145 }).unwrap();
        assert_eq!(completed["kind"], "completed");
        assert_eq!(completed["remaining_ms"], 145);

        let expired = serde_json::to_value(RunOutcome::Expired {
            unexecuted: vec!["a".to_string(), "b".to_string()],
        })
        .unwrap();
        assert_eq!(expired["kind"], "expired");
        assert_eq!(expired["unexecuted"][1], "b");
    }
}
