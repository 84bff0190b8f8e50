//! CRUD client for the remote overlay store.
//!
//! The store is the source of truth for overlay records. Each operation is a
//! single HTTP round trip; any transport or server failure surfaces as
//! [`Error::StoreUnavailable`] and leaves local state untouched, because the
//! collection manager commits mutations only after a call succeeds.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{Error, Result};

use super::types::{NewOverlay, Overlay, Position, Size, DEFAULT_POSITION, DEFAULT_SIZE};

/// Remote overlay store interface.
///
/// Implementations are expected to be cheaply shareable behind an `Arc` so
/// the collection manager and tests can swap backends freely.
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Fetch every overlay record.
    async fn list(&self) -> Result<Vec<Overlay>>;

    /// Create a new overlay and return the stored record with its
    /// server-assigned identifier.
    async fn create(&self, overlay: NewOverlay) -> Result<Overlay>;

    /// Replace the record for `id` with the given full overlay.
    async fn update(&self, id: &str, overlay: &Overlay) -> Result<()>;

    /// Delete the record for `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// HTTP client for the overlay store API.
pub struct HttpOverlayStore {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CreatePayload<'a> {
    text: &'a str,
    position: Position,
    size: Size,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
    overlay: Overlay,
}

#[derive(Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    message: String,
}

impl HttpOverlayStore {
    pub fn new(config: &StoreConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

/// Pass successful responses through; turn everything else into
/// [`Error::StoreUnavailable`] carrying the status and response body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::store_unavailable(format!("{}: {}", status, body)))
}

#[async_trait]
impl OverlayStore for HttpOverlayStore {
    async fn list(&self) -> Result<Vec<Overlay>> {
        let response = self.client.get(self.url("/overlays")).send().await?;
        let overlays: Vec<Overlay> = check_status(response).await?.json().await?;
        tracing::debug!(count = overlays.len(), "Fetched overlays");
        Ok(overlays)
    }

    async fn create(&self, overlay: NewOverlay) -> Result<Overlay> {
        // The store requires full geometry on creation.
        let payload = CreatePayload {
            text: &overlay.text,
            position: overlay.position.unwrap_or(DEFAULT_POSITION),
            size: overlay.size.unwrap_or(DEFAULT_SIZE),
        };

        let response = self
            .client
            .post(self.url("/overlays"))
            .json(&payload)
            .send()
            .await?;
        let created: CreatedEnvelope = check_status(response).await?.json().await?;
        tracing::info!(id = %created.overlay.id, "Created overlay");
        Ok(created.overlay)
    }

    async fn update(&self, id: &str, overlay: &Overlay) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("/overlays/{}", id)))
            .json(overlay)
            .send()
            .await?;
        check_status(response).await?;
        tracing::debug!(id = %id, "Updated overlay");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/overlays/{}", id)))
            .send()
            .await?;
        let ack: AckEnvelope = check_status(response).await?.json().await?;
        tracing::debug!(id = %id, message = %ack.message, "Deleted overlay");
        Ok(())
    }
}
