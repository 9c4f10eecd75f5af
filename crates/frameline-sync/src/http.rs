use std::time::Duration;

use async_trait::async_trait;

use frameline_types::{ContentHash, PhotoRecord};

use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteInventory;

/// Bounded per-request timeout. One unresponsive remote must not stall a
/// sync cycle indefinitely; a timeout surfaces as a connection failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of [`RemoteInventory`] against the store's routes:
/// `GET /photos/list` for the inventory, `GET /photos/{hash}` for content.
pub struct HttpInventory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpInventory {
    /// Create a client for the store at `base_url`
    /// (e.g. `http://frame-server:8080`).
    pub fn new(base_url: impl Into<String>) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::Connection(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The remote base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteInventory for HttpInventory {
    async fn fetch_inventory(&self) -> SyncResult<Vec<PhotoRecord>> {
        let url = format!("{}/photos/list", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Connection(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Connection(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| SyncError::Decode(e.to_string()))
    }

    async fn fetch_photo(&self, hash: &ContentHash) -> SyncResult<Vec<u8>> {
        let url = format!("{}/photos/{}", self.base_url, hash);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Connection(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SyncError::Remote(format!(
                "status {} fetching {}",
                response.status(),
                hash.short_hex()
            )));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Connection(e.to_string()))?;
        Ok(body.to_vec())
    }
}
