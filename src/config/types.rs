use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

/// Connection settings for the remote overlay store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Connection settings for the RTSP relay/transcode service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the fixed manifest slot the relay publishes to. One relay
    /// session is active at a time, so this is configuration rather than
    /// part of the relay response.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RelayConfig {
    /// Absolute URL of the published manifest slot.
    pub fn manifest_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.manifest_path
        )
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_manifest_path() -> String {
    "/static/stream.m3u8".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            manifest_path: default_manifest_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
