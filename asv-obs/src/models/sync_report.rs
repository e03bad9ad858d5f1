//! Per-record sync outcomes and the batch report

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of one create-record call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Remote store accepted the record
    Submitted,
    /// Remote store rejected the record (non-success status or transport
    /// failure, timeout included); not retried
    Rejected { reason: String },
}

/// Outcome of one staged record's submission attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub record_id: Uuid,
    pub common_name: String,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Report for one full sync pass, in submission (= insertion) order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn submitted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == SyncOutcome::Submitted)
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.submitted_count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.rejected_count() == 0
    }

    /// Acknowledgment line for the caller's notification
    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No observations to sync".to_string()
        } else if self.all_succeeded() {
            "Your observations have been synced".to_string()
        } else {
            format!(
                "Sync completed with {} of {} observations rejected",
                self.rejected_count(),
                self.outcomes.len()
            )
        }
    }
}
