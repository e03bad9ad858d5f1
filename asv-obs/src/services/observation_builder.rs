//! Observation builder: validate a draft, resolve the catalog entry, and
//! stage the assembled record.

use thiserror::Error;

use asv_common::ReferenceCatalog;

use crate::models::{ObservationDraft, ObservationRecord, COUNT_MAX, COUNT_MIN};
use crate::services::StagingStore;

/// Local validation failures on submit. None of these mutate the staging
/// store; the caller surfaces them so the user can correct the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Submission without surveyor attribution is refused
    #[error("At least one surveyor must be selected")]
    MissingSurveyors,

    /// The specimen selector is populated from catalog names, so a miss
    /// indicates stale client state rather than user typo
    #[error("Specimen not in reference catalog: {0}")]
    UnknownSpecimen(String),

    #[error("Count {0} outside accepted range {COUNT_MIN}-{COUNT_MAX}")]
    InvalidCount(u32),
}

/// Validate `draft`, resolve its specimen against `catalog`, append the
/// assembled record to `store`, and return a copy of what was staged.
///
/// Taxonomic fields are copied verbatim from the catalog entry. The image
/// URL is resolved by the caller before staging (upload failure stages an
/// empty URL rather than blocking submission).
pub fn build_and_stage(
    draft: &ObservationDraft,
    catalog: &ReferenceCatalog,
    store: &mut StagingStore,
    image_url: String,
) -> Result<ObservationRecord, BuildError> {
    if draft.surveyors.is_empty() {
        return Err(BuildError::MissingSurveyors);
    }

    let entry = catalog
        .lookup(&draft.specimen)
        .ok_or_else(|| BuildError::UnknownSpecimen(draft.specimen.clone()))?;

    if !(COUNT_MIN..=COUNT_MAX).contains(&draft.count) {
        return Err(BuildError::InvalidCount(draft.count));
    }

    let record = ObservationRecord::from_draft(draft, entry, image_url);
    tracing::info!(
        record_id = %record.id,
        common_name = %record.common_name,
        count = record.count,
        "Observation staged"
    );
    store.append(record.clone());
    Ok(record)
}
