//! iNaturalist reference-photo lookup
//!
//! Presentation-layer collaborator: fetches reference photos for the
//! specimen card. Lookup never fails outward; any miss (including the
//! sentinel genus/species "Unknown") yields the fixed placeholder URL.

use std::time::Duration;

use serde::Deserialize;

const INATURALIST_AUTOCOMPLETE_URL: &str = "https://api.inaturalist.org/v1/taxa/autocomplete";
const INATURALIST_TAXA_URL: &str = "https://api.inaturalist.org/v1/taxa";
const USER_AGENT: &str = "ASV/0.1.0 (arthropod survey)";

/// Shown when no reference photo can be resolved
pub const PLACEHOLDER_PHOTO_URL: &str = "https://i.ibb.co/m6YDp69/sorry.jpg";

/// Sentinel catalog value for unidentified specimens
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    results: Vec<AutocompleteResult>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResult {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct TaxaResponse {
    results: Vec<TaxonDetail>,
}

#[derive(Debug, Deserialize)]
struct TaxonDetail {
    taxon_photos: Option<Vec<TaxonPhoto>>,
}

#[derive(Debug, Deserialize)]
struct TaxonPhoto {
    photo: PhotoDetail,
}

#[derive(Debug, Deserialize)]
struct PhotoDetail {
    large_url: Option<String>,
}

/// iNaturalist taxa API client
pub struct INaturalistClient {
    http_client: reqwest::Client,
}

impl INaturalistClient {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self { http_client }
    }

    /// Reference photo URL for a species, `index` selecting among the
    /// taxon's photos (0 = first). Falls back to the placeholder on any
    /// miss.
    pub async fn species_photo(&self, genus: &str, species: &str, index: usize) -> String {
        if genus == UNKNOWN || species == UNKNOWN {
            return PLACEHOLDER_PHOTO_URL.to_string();
        }
        match self.try_species_photo(genus, species, index).await {
            Some(url) => url,
            None => {
                tracing::debug!(genus, species, index, "No reference photo found");
                PLACEHOLDER_PHOTO_URL.to_string()
            }
        }
    }

    async fn try_species_photo(&self, genus: &str, species: &str, index: usize) -> Option<String> {
        // Resolve "{genus} {species}" to a taxon id, first hit only
        let response = self
            .http_client
            .get(INATURALIST_AUTOCOMPLETE_URL)
            .query(&[("q", format!("{} {}", genus, species)), ("limit", "1".to_string())])
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let autocomplete: AutocompleteResponse = response.json().await.ok()?;
        let taxon_id = autocomplete.results.first()?.id;

        // Fetch the taxon's photo list
        let response = self
            .http_client
            .get(format!("{}/{}?locale=en", INATURALIST_TAXA_URL, taxon_id))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let taxa: TaxaResponse = response.json().await.ok()?;
        let photos = taxa.results.first()?.taxon_photos.as_ref()?;
        photos.get(index)?.photo.large_url.clone()
    }
}

impl Default for INaturalistClient {
    fn default() -> Self {
        Self::new()
    }
}
