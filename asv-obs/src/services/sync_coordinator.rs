//! Sync coordinator: batch submission of staged observations
//!
//! State machine: Idle -> Syncing -> Idle, entered only on an explicit
//! sync trigger. Records are submitted one create-call at a time in strict
//! insertion order; per-record failures are collected, never retried, and
//! never abort the batch.

use asv_common::config::SyncPolicy;

use crate::models::{RecordOutcome, SyncOutcome, SyncReport};
use crate::services::{RemoteStoreClient, StagingStore};

/// Coordinator state, observable between passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Drains the staging store against the remote store client
pub struct SyncCoordinator {
    policy: SyncPolicy,
    state: SyncState,
}

impl SyncCoordinator {
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            policy,
            state: SyncState::Idle,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Submit every staged record, one create-record call each, in
    /// insertion order.
    ///
    /// With the default `BestEffort` policy the store ends empty after a
    /// full pass regardless of how many records were rejected (inherited
    /// clear-on-completion behavior). With `RetainRejected`, rejected
    /// records are re-staged in their original relative order for a later
    /// re-sync. An empty store returns an empty report with zero remote
    /// calls.
    pub async fn sync_all(
        &mut self,
        store: &mut StagingStore,
        remote: &dyn RemoteStoreClient,
    ) -> SyncReport {
        if store.is_empty() {
            return SyncReport::default();
        }

        self.state = SyncState::Syncing;
        let batch = store.take_all();
        tracing::info!(batch_size = batch.len(), "Sync started");

        let mut outcomes = Vec::with_capacity(batch.len());
        let mut rejected = Vec::new();

        for record in batch {
            let fields = record.to_remote_fields();
            match remote.create_record(&fields, record.id).await {
                Ok(()) => {
                    tracing::info!(
                        record_id = %record.id,
                        common_name = %record.common_name,
                        "Record submitted to remote store"
                    );
                    outcomes.push(RecordOutcome {
                        record_id: record.id,
                        common_name: record.common_name.clone(),
                        outcome: SyncOutcome::Submitted,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        record_id = %record.id,
                        common_name = %record.common_name,
                        error = %e,
                        "Record rejected by remote store"
                    );
                    outcomes.push(RecordOutcome {
                        record_id: record.id,
                        common_name: record.common_name.clone(),
                        outcome: SyncOutcome::Rejected {
                            reason: e.to_string(),
                        },
                    });
                    rejected.push(record);
                }
            }
        }

        if self.policy == SyncPolicy::RetainRejected && !rejected.is_empty() {
            store.restage(rejected);
        }

        let report = SyncReport { outcomes };
        tracing::info!(
            submitted = report.submitted_count(),
            rejected = report.rejected_count(),
            retained = store.len(),
            "Sync completed"
        );
        self.state = SyncState::Idle;
        report
    }
}
