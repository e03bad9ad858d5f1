//! In-session staging store for not-yet-synced observations
//!
//! Ordered collection; insertion order is display order. Positions are
//! derived from the current index, so a position is only meaningful
//! between renders with no structural change in between. Each record also
//! carries a stable surrogate id for callers that want deletion decoupled
//! from transient display order.

use thiserror::Error;
use uuid::Uuid;

use crate::models::ObservationRecord;

/// Delete-by-selection failures. All of them are silent no-ops at the API
/// boundary: nothing is mutated and no error is surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("No observation is staged")]
    NoSelection,

    #[error("Position {0} is out of range")]
    IndexOutOfRange(usize),

    #[error("No staged observation with id {0}")]
    UnknownId(Uuid),
}

/// Ordered, session-local collection of staged observations
#[derive(Debug, Default)]
pub struct StagingStore {
    records: Vec<ObservationRecord>,
}

impl StagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append preserves insertion order; new records always land at the end
    pub fn append(&mut self, record: ObservationRecord) {
        self.records.push(record);
    }

    /// Staged records in display order
    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove exactly the record at `position`; later records shift down
    /// by one. Invalid positions leave the store unchanged.
    pub fn delete_at(&mut self, position: usize) -> Result<ObservationRecord, DeleteError> {
        if self.records.is_empty() {
            return Err(DeleteError::NoSelection);
        }
        if position >= self.records.len() {
            return Err(DeleteError::IndexOutOfRange(position));
        }
        Ok(self.records.remove(position))
    }

    /// Remove the record with the given surrogate id, wherever it currently
    /// sits in display order.
    pub fn delete_by_id(&mut self, id: Uuid) -> Result<ObservationRecord, DeleteError> {
        if self.records.is_empty() {
            return Err(DeleteError::NoSelection);
        }
        match self.records.iter().position(|r| r.id == id) {
            Some(position) => Ok(self.records.remove(position)),
            None => Err(DeleteError::UnknownId(id)),
        }
    }

    /// Snapshot and clear: the sync coordinator drains the store as its
    /// batch, leaving an empty collection behind.
    pub fn take_all(&mut self) -> Vec<ObservationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Put records back after a retain-rejected sync pass; relative order
    /// is preserved.
    pub fn restage(&mut self, records: Vec<ObservationRecord>) {
        self.records.extend(records);
    }
}
