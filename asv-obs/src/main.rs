//! asv-obs - Observation Staging & Sync service
//!
//! Stages arthropod survey observations per session, serves the reference
//! catalog, and batch-syncs staged records to the remote tabular store.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use asv_common::config::ServiceConfig;
use asv_common::ReferenceCatalog;
use asv_obs::services::{
    AirtableClient, ImageUploadService, ImgurClient, RemoteStoreClient, UnconfiguredRemoteStore,
};
use asv_obs::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting asv-obs (Observation Staging & Sync)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::load(None)?;

    // Catalog is loaded once and immutable afterwards
    let catalog = match &config.catalog_path {
        Some(path) => ReferenceCatalog::load(path)?,
        None => {
            info!("No catalog path configured, using built-in catalog");
            ReferenceCatalog::builtin()
        }
    };
    info!("Reference catalog: {} entries", catalog.len());

    // Missing remote credentials keep the service usable for staging;
    // every sync attempt just reports the records as rejected.
    let remote: Arc<dyn RemoteStoreClient> = match AirtableClient::new(&config.remote_store) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("Remote store unavailable: {}", e);
            Arc::new(UnconfiguredRemoteStore)
        }
    };

    let image_host: Option<Arc<dyn ImageUploadService>> =
        match ImgurClient::new(&config.image_host) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Image host unavailable: {}", e);
                None
            }
        };

    let state = AppState::new(catalog, remote, image_host, config.sync_policy);
    let app = asv_obs::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on http://{}", config.bind_addr());
    info!("Health check: http://{}/health", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
