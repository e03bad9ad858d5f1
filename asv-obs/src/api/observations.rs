//! Observation staging API handlers
//!
//! POST /api/observations (submit), GET /api/observations (verify grid),
//! DELETE /api/observations/:position (clear selected)

use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{ObservationDraft, ObservationRecord};
use crate::services::{build_and_stage, BuildError};
use crate::AppState;

/// POST /api/observations request: form state plus an optional local file
/// to push to the image host before staging
#[derive(Debug, Deserialize)]
pub struct SubmitObservationRequest {
    #[serde(flatten)]
    pub draft: ObservationDraft,
    /// Local path of an uploaded photo; upload failure does not block
    /// staging
    #[serde(default)]
    pub image_path: Option<PathBuf>,
}

/// POST /api/observations response
#[derive(Debug, Serialize)]
pub struct SubmitObservationResponse {
    pub record: ObservationRecord,
    /// True when a file was supplied but the image host call failed; the
    /// record was staged with an empty URL
    pub image_upload_failed: bool,
    /// Caller resets specimen, count, and notes after a successful append
    pub reset_form: bool,
    pub message: String,
}

/// GET /api/observations response
#[derive(Debug, Serialize)]
pub struct ListObservationsResponse {
    pub observations: Vec<ObservationRecord>,
}

/// DELETE /api/observations/:position response
///
/// Always 200: invalid selections are deliberate silent no-ops.
#[derive(Debug, Serialize)]
pub struct DeleteObservationResponse {
    pub deleted: bool,
    pub remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/observations
///
/// Uploads the photo first (if any), then validates the draft against the
/// catalog and appends the assembled record to the session's staging store.
pub async fn submit_observation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitObservationRequest>,
) -> ApiResult<Json<SubmitObservationResponse>> {
    let session = super::session_id(&headers)?;

    let (image_url, image_upload_failed) = match &request.image_path {
        Some(path) => match &state.image_host {
            Some(uploader) => match uploader.upload(path).await {
                Ok(url) => (url, false),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Image upload failed");
                    (String::new(), true)
                }
            },
            None => {
                tracing::warn!("Image supplied but no image host configured");
                (String::new(), true)
            }
        },
        None => (String::new(), false),
    };

    let mut sessions = state.sessions.write().await;
    let store = sessions.entry(session).or_default();

    let record = build_and_stage(&request.draft, &state.catalog, store, image_url)
        .map_err(|e: BuildError| ApiError::BadRequest(e.to_string()))?;

    Ok(Json(SubmitObservationResponse {
        record,
        image_upload_failed,
        reset_form: true,
        message: "Your observation has been recorded".to_string(),
    }))
}

/// GET /api/observations
///
/// Staged records for the session in display order.
pub async fn list_observations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ListObservationsResponse>> {
    let session = super::session_id(&headers)?;
    let sessions = state.sessions.read().await;
    let observations = sessions
        .get(&session)
        .map(|store| store.records().to_vec())
        .unwrap_or_default();
    Ok(Json(ListObservationsResponse { observations }))
}

/// DELETE /api/observations/:position
///
/// Removes the record at the zero-based display position; later records
/// shift down by one. Any invalid selection (empty store, out-of-range,
/// negative, non-numeric) leaves the store unchanged and still answers
/// 200, so the segment is parsed here rather than by the extractor.
pub async fn delete_observation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(position): Path<String>,
) -> ApiResult<Json<DeleteObservationResponse>> {
    let session = super::session_id(&headers)?;
    let mut sessions = state.sessions.write().await;

    let Some(store) = sessions.get_mut(&session) else {
        return Ok(Json(DeleteObservationResponse {
            deleted: false,
            remaining: 0,
            message: None,
        }));
    };

    let Ok(position) = position.parse::<usize>() else {
        tracing::debug!(session = %session, position = %position, "Delete was a no-op");
        return Ok(Json(DeleteObservationResponse {
            deleted: false,
            remaining: store.len(),
            message: None,
        }));
    };

    match store.delete_at(position) {
        Ok(removed) => {
            tracing::info!(
                session = %session,
                record_id = %removed.id,
                common_name = %removed.common_name,
                "Observation cleared"
            );
            Ok(Json(DeleteObservationResponse {
                deleted: true,
                remaining: store.len(),
                message: Some("Your observation has been cleared".to_string()),
            }))
        }
        Err(e) => {
            tracing::debug!(session = %session, position, error = %e, "Delete was a no-op");
            Ok(Json(DeleteObservationResponse {
                deleted: false,
                remaining: store.len(),
                message: None,
            }))
        }
    }
}

/// DELETE /api/observations/by-id/:id
///
/// Deletion by surrogate id, independent of transient display order. Same
/// silent no-op semantics as delete-by-position.
pub async fn delete_observation_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteObservationResponse>> {
    let session = super::session_id(&headers)?;
    let mut sessions = state.sessions.write().await;

    let Some(store) = sessions.get_mut(&session) else {
        return Ok(Json(DeleteObservationResponse {
            deleted: false,
            remaining: 0,
            message: None,
        }));
    };

    match store.delete_by_id(id) {
        Ok(removed) => {
            tracing::info!(
                session = %session,
                record_id = %removed.id,
                "Observation cleared"
            );
            Ok(Json(DeleteObservationResponse {
                deleted: true,
                remaining: store.len(),
                message: Some("Your observation has been cleared".to_string()),
            }))
        }
        Err(_) => Ok(Json(DeleteObservationResponse {
            deleted: false,
            remaining: store.len(),
            message: None,
        })),
    }
}

/// Build observation staging routes
pub fn observation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/observations",
            get(list_observations).post(submit_observation),
        )
        .route("/api/observations/:position", delete(delete_observation))
        .route(
            "/api/observations/by-id/:id",
            delete(delete_observation_by_id),
        )
}
