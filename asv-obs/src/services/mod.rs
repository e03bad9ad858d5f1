//! Engine services: staging, building, deletion, sync, and the
//! collaborator clients (remote store, image host, reference photos)

pub mod image_upload;
pub mod inaturalist_client;
pub mod observation_builder;
pub mod remote_store;
pub mod staging_store;
pub mod sync_coordinator;

pub use image_upload::{ImageUploadService, ImgurClient, UploadError};
pub use inaturalist_client::{INaturalistClient, PLACEHOLDER_PHOTO_URL};
pub use observation_builder::{build_and_stage, BuildError};
pub use remote_store::{AirtableClient, RemoteError, RemoteStoreClient, UnconfiguredRemoteStore};
pub use staging_store::{DeleteError, StagingStore};
pub use sync_coordinator::{SyncCoordinator, SyncState};
