//! Data models for the observation staging & sync service

pub mod observation;
pub mod sync_report;

pub use observation::{ObservationDraft, ObservationRecord, COUNT_MAX, COUNT_MIN};
pub use sync_report::{RecordOutcome, SyncOutcome, SyncReport};
