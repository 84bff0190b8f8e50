//! Stream source resolution.
//!
//! Classifies a raw user-supplied URL string into a playback strategy
//! family. RTSP feeds cannot be played by the media element and must be
//! relayed through the backend transcoder; HTTP(S) URLs are playable
//! directly. Everything else is rejected before any playback attempt.

use crate::error::{Error, Result};

/// URL scheme that requires the backend relay.
pub const RELAY_SCHEME: &str = "rtsp://";

/// A classified playback source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSource {
    /// RTSP feed to forward to the relay endpoint. The playable URL is the
    /// relay's fixed published manifest location, not this value.
    Relay(String),
    /// HTTP(S) URL usable directly as the playable media URL.
    Direct(String),
}

impl StreamSource {
    /// Classify `input` into a source, trimming surrounding whitespace.
    ///
    /// Empty input and unrecognized schemes yield [`Error::InvalidSource`];
    /// callers must surface the rejection and must not attempt playback.
    pub fn resolve(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::invalid_source(input));
        }

        if input.starts_with(RELAY_SCHEME) {
            Ok(Self::Relay(input.to_string()))
        } else if input.starts_with("http://") || input.starts_with("https://") {
            Ok(Self::Direct(input.to_string()))
        } else {
            Err(Error::invalid_source(input))
        }
    }
}
