//! Remote tabular store client
//!
//! One create-record call per observation against the store's write
//! endpoint. The production implementation targets an Airtable-style REST
//! API; the trait seam exists so the sync coordinator can be exercised
//! against fakes.

use std::time::Duration;

use serde_json::{json, Map, Value};
use thiserror::Error;
use uuid::Uuid;

use asv_common::config::RemoteStoreConfig;

const AIRTABLE_BASE_URL: &str = "https://api.airtable.com/v0";
const USER_AGENT: &str = "ASV/0.1.0 (arthropod survey)";

/// Remote store client errors. The sync coordinator treats every variant
/// the same way: the record is marked rejected and the batch continues.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure, timeout included
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the store
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Client was built without the credentials it needs
    #[error("Remote store not configured: {0}")]
    Misconfigured(String),
}

/// Seam for the external tabular store's write endpoint
#[async_trait::async_trait]
pub trait RemoteStoreClient: Send + Sync {
    /// Create one record. `idempotency_key` is the record's surrogate id,
    /// forwarded so a deduplicating backend can drop repeats; the Airtable
    /// API ignores it.
    async fn create_record(
        &self,
        fields: &Map<String, Value>,
        idempotency_key: Uuid,
    ) -> Result<(), RemoteError>;
}

/// Airtable-style REST client: POST `{base}/{base_id}/{table}` with a
/// `{"fields": {...}}` body and bearer auth.
pub struct AirtableClient {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl AirtableClient {
    pub fn new(config: &RemoteStoreConfig) -> Result<Self, RemoteError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RemoteError::Misconfigured("missing api_key".to_string()))?;
        let base_id = config
            .base_id
            .clone()
            .ok_or_else(|| RemoteError::Misconfigured("missing base_id".to_string()))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url: format!(
                "{}/{}/{}",
                AIRTABLE_BASE_URL, base_id, config.observation_table
            ),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl RemoteStoreClient for AirtableClient {
    async fn create_record(
        &self,
        fields: &Map<String, Value>,
        idempotency_key: Uuid,
    ) -> Result<(), RemoteError> {
        tracing::debug!(url = %self.url, key = %idempotency_key, "Submitting record to remote store");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("X-Idempotency-Key", idempotency_key.to_string())
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(status.as_u16(), body));
        }

        Ok(())
    }
}

/// Stand-in used when no remote store credentials are configured. Every
/// create call is rejected, which surfaces in the sync report instead of
/// preventing the service from starting.
pub struct UnconfiguredRemoteStore;

#[async_trait::async_trait]
impl RemoteStoreClient for UnconfiguredRemoteStore {
    async fn create_record(
        &self,
        _fields: &Map<String, Value>,
        _idempotency_key: Uuid,
    ) -> Result<(), RemoteError> {
        Err(RemoteError::Misconfigured(
            "remote store credentials not configured".to_string(),
        ))
    }
}
