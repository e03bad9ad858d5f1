//! Image host upload client
//!
//! One file per call; the engine treats any failure as a single
//! "image upload failed" signal and stages the observation with an empty
//! URL rather than aborting the submission.

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use asv_common::config::ImageHostConfig;

const IMGUR_UPLOAD_URL: &str = "https://api.imgur.com/3/upload";
const USER_AGENT: &str = "ASV/0.1.0 (arthropod survey)";

/// Image upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Image host not configured: {0}")]
    Misconfigured(String),
}

/// Seam for the image hosting collaborator
#[async_trait::async_trait]
pub trait ImageUploadService: Send + Sync {
    /// Upload one local file; returns the public URL on success
    async fn upload(&self, path: &Path) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct ImgurUploadResponse {
    data: ImgurUploadData,
}

#[derive(Debug, Deserialize)]
struct ImgurUploadData {
    link: String,
}

/// Imgur anonymous-upload client: POST the file base64-encoded with
/// `Client-ID` auth, the public URL comes back as `data.link`.
pub struct ImgurClient {
    http_client: reqwest::Client,
    client_id: String,
}

impl ImgurClient {
    pub fn new(config: &ImageHostConfig) -> Result<Self, UploadError> {
        let client_id = config
            .client_id
            .clone()
            .ok_or_else(|| UploadError::Misconfigured("missing client_id".to_string()))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            client_id,
        })
    }
}

#[async_trait::async_trait]
impl ImageUploadService for ImgurClient {
    async fn upload(&self, path: &Path) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(path).await?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

        tracing::debug!(path = %path.display(), "Uploading image to Imgur");

        let response = self
            .http_client
            .post(IMGUR_UPLOAD_URL)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .json(&json!({ "image": encoded, "type": "base64" }))
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Api(status.as_u16(), body));
        }

        let parsed: ImgurUploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Parse(e.to_string()))?;

        tracing::info!(url = %parsed.data.link, "Image uploaded");
        Ok(parsed.data.link)
    }
}
