//! Reference catalog API handlers
//!
//! GET /api/catalog/names (specimen selector), GET /api/catalog/:name
//! (specimen card with ID notes and reference photos)

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use asv_common::CatalogEntry;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/catalog/names response
#[derive(Debug, Serialize)]
pub struct CatalogNamesResponse {
    /// Ascending lexical order
    pub names: Vec<String>,
}

/// GET /api/catalog/:common_name response
#[derive(Debug, Serialize)]
pub struct CatalogEntryResponse {
    pub entry: CatalogEntry,
    /// Reference photos for the specimen card; the placeholder URL when
    /// the species cannot be resolved
    pub photo_urls: Vec<String>,
}

/// GET /api/catalog/names
pub async fn catalog_names(State(state): State<AppState>) -> Json<CatalogNamesResponse> {
    Json(CatalogNamesResponse {
        names: state.catalog.all_common_names(),
    })
}

/// GET /api/catalog/:common_name
pub async fn catalog_entry(
    State(state): State<AppState>,
    Path(common_name): Path<String>,
) -> ApiResult<Json<CatalogEntryResponse>> {
    let entry = state
        .catalog
        .lookup(&common_name)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("No catalog entry for {}", common_name)))?;

    // Two reference photos, matching the specimen card layout
    let first = state
        .photos
        .species_photo(&entry.genus, &entry.species, 0)
        .await;
    let second = state
        .photos
        .species_photo(&entry.genus, &entry.species, 1)
        .await;

    Ok(Json(CatalogEntryResponse {
        entry,
        photo_urls: vec![first, second],
    }))
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog/names", get(catalog_names))
        .route("/api/catalog/:common_name", get(catalog_entry))
}
