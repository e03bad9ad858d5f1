//! Sync API handler: POST /api/sync

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::models::{RecordOutcome, SyncReport};
use crate::services::SyncCoordinator;
use crate::AppState;

/// POST /api/sync response
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub submitted: usize,
    pub rejected: usize,
    pub outcomes: Vec<RecordOutcome>,
    pub message: String,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            submitted: report.submitted_count(),
            rejected: report.rejected_count(),
            message: report.summary(),
            outcomes: report.outcomes,
        }
    }
}

/// POST /api/sync
///
/// Submits every staged record for the session to the remote store, one
/// create-call per record in insertion order. The write lock on the
/// session map is held for the whole pass, so a session's events stay
/// totally ordered. An empty store answers immediately with an empty
/// report and no remote calls.
pub async fn sync_observations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SyncResponse>> {
    let session = super::session_id(&headers)?;
    let mut sessions = state.sessions.write().await;

    let Some(store) = sessions.get_mut(&session) else {
        return Ok(Json(SyncResponse::from(SyncReport::default())));
    };

    let mut coordinator = SyncCoordinator::new(state.sync_policy);
    let report = coordinator.sync_all(store, state.remote.as_ref()).await;

    Ok(Json(SyncResponse::from(report)))
}

/// Build sync routes
pub fn sync_routes() -> Router<AppState> {
    Router::new().route("/api/sync", post(sync_observations))
}
