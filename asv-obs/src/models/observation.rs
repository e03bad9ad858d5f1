//! Observation record and submission draft
//!
//! An `ObservationRecord` is one arthropod sighting, staged in memory until
//! the user syncs it to the remote tabular store. Taxonomic fields are
//! always copied verbatim from the reference catalog entry for the chosen
//! common name; they are never independently editable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use asv_common::CatalogEntry;

/// Smallest accepted specimen count
pub const COUNT_MIN: u32 = 1;
/// Largest accepted specimen count (matches the form slider range)
pub const COUNT_MAX: u32 = 100;

/// Form state submitted by the client; validated and resolved against the
/// catalog by the observation builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationDraft {
    pub date_observed: NaiveDate,
    pub location: String,
    pub plot: String,
    pub survey_point: String,
    pub side: String,
    /// Common name of the specimen; must exist in the reference catalog
    pub specimen: String,
    pub count: u32,
    #[serde(default)]
    pub notes: String,
    /// Non-empty at submission time; enforced by the builder
    #[serde(default)]
    pub surveyors: Vec<String>,
}

/// One staged (or just-synced) arthropod sighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Stable surrogate identity assigned at creation; also passed to the
    /// remote store as a client-side idempotency token
    pub id: Uuid,
    pub date_observed: NaiveDate,
    pub location: String,
    pub plot: String,
    pub survey_point: String,
    pub side: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub common_name: String,
    pub genus: String,
    pub species: String,
    pub count: u32,
    pub notes: String,
    pub surveyors: Vec<String>,
    /// Public URL of the uploaded photo, empty when none was supplied or
    /// the upload failed
    pub image_url: String,
}

/// Surveyors form a set: drop repeated names, keeping first-seen order
fn dedup_surveyors(surveyors: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    surveyors
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

impl ObservationRecord {
    /// Assemble a record from a validated draft and its catalog entry.
    ///
    /// The caller has already checked surveyors, count bounds, and that the
    /// entry matches `draft.specimen`.
    pub fn from_draft(draft: &ObservationDraft, entry: &CatalogEntry, image_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            date_observed: draft.date_observed,
            location: draft.location.clone(),
            plot: draft.plot.clone(),
            survey_point: draft.survey_point.clone(),
            side: draft.side.clone(),
            class: entry.class.clone(),
            order: entry.order.clone(),
            family: entry.family.clone(),
            common_name: entry.common_name.clone(),
            genus: entry.genus.clone(),
            species: entry.species.clone(),
            count: draft.count,
            notes: draft.notes.clone(),
            surveyors: dedup_surveyors(&draft.surveyors),
            image_url,
        }
    }

    /// Surveyor set rendered as the delimited string the remote store expects
    pub fn surveyors_joined(&self) -> String {
        self.surveyors.join(", ")
    }

    /// Field-name-to-value mapping for the remote store's create-record
    /// call. Column names follow the observation table schema.
    pub fn to_remote_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "Date observed".to_string(),
            json!(self.date_observed.to_string()),
        );
        fields.insert("Location".to_string(), json!(self.location));
        fields.insert("Plot".to_string(), json!(self.plot));
        fields.insert("Survey Point".to_string(), json!(self.survey_point));
        fields.insert("Side".to_string(), json!(self.side));
        fields.insert("Class".to_string(), json!(self.class));
        fields.insert("Order".to_string(), json!(self.order));
        fields.insert("Family".to_string(), json!(self.family));
        fields.insert("Common Name".to_string(), json!(self.common_name));
        fields.insert("Genus".to_string(), json!(self.genus));
        fields.insert("Species".to_string(), json!(self.species));
        fields.insert("Count".to_string(), json!(self.count));
        fields.insert("Notes".to_string(), json!(self.notes));
        fields.insert("Surveyors".to_string(), json!(self.surveyors_joined()));
        fields.insert("Url".to_string(), json!(self.image_url));
        if !self.image_url.is_empty() {
            fields.insert(
                "Image attachment".to_string(),
                json!([{ "url": self.image_url }]),
            );
        }
        fields
    }
}
