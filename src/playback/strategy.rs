//! Playback strategy selection.
//!
//! Given a resolved media URL and what the host platform can do, picks how
//! the media element should be driven:
//!
//! - **Adaptive**: software adaptive-streaming engine; playback starts once
//!   the manifest has been parsed.
//! - **Native**: plain file playback through the element's own decoder.
//! - **NativeAdaptive**: the element's built-in adaptive support; playback
//!   start is deferred until the element reports loaded metadata.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File suffix of adaptive streaming manifests.
pub const ADAPTIVE_MANIFEST_EXT: &str = ".m3u8";

/// Container formats the media element plays directly.
const NATIVE_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// How a resolved media URL is driven through the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStrategy {
    /// Software adaptive-streaming engine attached to the element.
    Adaptive,
    /// Direct file playback.
    Native,
    /// The element's built-in adaptive-manifest support.
    NativeAdaptive,
}

/// Capability report from the platform's media element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// A software adaptive-streaming engine is available.
    pub adaptive_engine: bool,
    /// The element reports native support for the adaptive manifest MIME
    /// type.
    pub native_adaptive: bool,
}

/// Pick a strategy for `media_url`, or [`Error::Unsupported`] when no
/// strategy can play it. Failure is reported to the caller; no partial
/// playback attempt is made.
pub fn select_strategy(
    media_url: &str,
    caps: &PlatformCapabilities,
) -> Result<PlaybackStrategy> {
    if is_adaptive_manifest(media_url) && caps.adaptive_engine {
        return Ok(PlaybackStrategy::Adaptive);
    }
    if has_native_extension(media_url) {
        return Ok(PlaybackStrategy::Native);
    }
    if caps.native_adaptive {
        return Ok(PlaybackStrategy::NativeAdaptive);
    }
    Err(Error::unsupported(media_url))
}

fn is_adaptive_manifest(url: &str) -> bool {
    url.ends_with(ADAPTIVE_MANIFEST_EXT)
}

fn has_native_extension(url: &str) -> bool {
    match url.rsplit_once('.') {
        Some((_, ext)) => NATIVE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        None => false,
    }
}
