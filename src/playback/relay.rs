//! Client for the RTSP relay/transcode endpoint.
//!
//! The relay is a remote collaborator that transcodes an RTSP feed into an
//! adaptive stream published at a fixed, well-known manifest path. Only one
//! relay session is assumed active at a time; the manifest location is
//! configuration, not part of the relay's response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::RelayConfig;
use crate::error::{Error, Result};

/// Relay/transcode service interface.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Ask the backend to start transcoding `rtsp_url` into the shared
    /// manifest slot. Success means the manifest path becomes (or stays)
    /// valid for subsequent playback.
    async fn start(&self, rtsp_url: &str) -> Result<()>;
}

/// HTTP client for the relay endpoint.
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    message: String,
}

impl HttpRelayClient {
    pub fn new(config: &RelayConfig) -> Self {
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

    fn url(&self) -> String {
        format!("{}/api/stream", self.base_url)
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn start(&self, rtsp_url: &str) -> Result<()> {
        let response = self
            .client
            .get(self.url())
            .query(&[("url", rtsp_url)])
            .send()
            .await
            .map_err(|e| Error::relay_start(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::relay_start(format!("{}: {}", status, body)));
        }

        let ack: AckEnvelope = response
            .json()
            .await
            .map_err(|e| Error::relay_start(e.to_string()))?;
        tracing::info!(url = %rtsp_url, message = %ack.message, "Relay stream started");
        Ok(())
    }
}
