//! HTTP API handlers for asv-obs
//!
//! The session id travels in the `X-Session-Id` header; each session owns
//! an independent staging store.

pub mod catalog;
pub mod health;
pub mod observations;
pub mod sync;

pub use catalog::catalog_routes;
pub use health::health_routes;
pub use observations::observation_routes;
pub use sync::sync_routes;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::{ApiError, ApiResult};

/// Header carrying the caller's session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Extract and parse the session id header
pub(crate) fn session_id(headers: &HeaderMap) -> ApiResult<Uuid> {
    let value = headers
        .get(SESSION_HEADER)
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", SESSION_HEADER)))?;
    let text = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} header", SESSION_HEADER)))?;
    Uuid::parse_str(text)
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} header: {}", SESSION_HEADER, text)))
}
