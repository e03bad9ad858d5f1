//! asv-obs library interface
//!
//! Observation staging & sync engine for the arthropod survey: per-session
//! staging of observations, delete-by-selection, and batch sync against
//! the remote tabular store.

pub mod api;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use asv_common::config::SyncPolicy;
use asv_common::ReferenceCatalog;

use crate::services::{INaturalistClient, ImageUploadService, RemoteStoreClient, StagingStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Reference catalog, immutable after load, shared by every session
    pub catalog: Arc<ReferenceCatalog>,
    /// One staging store per session; a session only ever mutates its own
    pub sessions: Arc<RwLock<HashMap<Uuid, StagingStore>>>,
    /// Remote tabular store write endpoint
    pub remote: Arc<dyn RemoteStoreClient>,
    /// Image host, absent when no client id is configured
    pub image_host: Option<Arc<dyn ImageUploadService>>,
    /// Reference-photo lookup for the specimen card
    pub photos: Arc<INaturalistClient>,
    /// What sync_all does with rejected records
    pub sync_policy: SyncPolicy,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        catalog: ReferenceCatalog,
        remote: Arc<dyn RemoteStoreClient>,
        image_host: Option<Arc<dyn ImageUploadService>>,
        sync_policy: SyncPolicy,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            remote,
            image_host,
            photos: Arc::new(INaturalistClient::new()),
            sync_policy,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::observation_routes())
        .merge(api::sync_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .with_state(state)
}
