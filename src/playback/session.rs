//! Playback session lifecycle.
//!
//! A session is transient state describing one playback request. It is
//! replaced wholesale on every new request; the superseded session is
//! abandoned, not cancelled at the network layer, and any result that
//! arrives for it afterwards is discarded. Sessions are identified by a
//! generated id, never by URL equality, so requesting the same URL twice
//! cannot confuse a stale completion for a fresh one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;

use super::relay::RelayClient;
use super::source::StreamSource;
use super::strategy::{select_strategy, PlatformCapabilities, PlaybackStrategy};

/// Lifecycle state of the current playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No session exists.
    Idle,
    /// The session is resolving its media URL or waiting for its start
    /// signal.
    Loading,
    /// The media element is playing.
    Playing,
}

/// Lifecycle signal from the platform's media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSignal {
    /// The adaptive engine finished parsing the manifest.
    ManifestReady,
    /// The element loaded enough metadata to begin playback.
    MetadataLoaded,
}

/// One playback request, from user input to a playing stream.
///
/// `media_url` and `strategy` stay `None` while a relay round trip is still
/// pending.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSession {
    pub id: Uuid,
    pub input_url: String,
    pub media_url: Option<String>,
    pub strategy: Option<PlaybackStrategy>,
    pub state: PlaybackState,
    pub started_at: DateTime<Utc>,
}

/// Owner of the current playback session.
pub struct PlaybackController {
    relay: Arc<dyn RelayClient>,
    caps: PlatformCapabilities,
    manifest_url: String,
    current: RwLock<Option<PlaybackSession>>,
}

impl PlaybackController {
    /// # Arguments
    /// * `relay` - client for the RTSP relay endpoint.
    /// * `caps` - what the platform's media element can do.
    /// * `manifest_url` - the relay's fixed published manifest location.
    pub fn new(
        relay: Arc<dyn RelayClient>,
        caps: PlatformCapabilities,
        manifest_url: String,
    ) -> Self {
        Self {
            relay,
            caps,
            manifest_url,
            current: RwLock::new(None),
        }
    }

    /// Start playback for a raw input URL.
    ///
    /// Installs a fresh `Loading` session before any network round trip,
    /// superseding whatever was there. Returns the new session id for
    /// correlating media element signals. Invalid input touches nothing;
    /// relay or strategy failures tear the fresh session back down to idle
    /// and surface the error.
    pub async fn play(&self, input: &str) -> Result<Uuid> {
        let source = StreamSource::resolve(input)?;
        let id = Uuid::new_v4();

        {
            let mut current = self.current.write();
            if let Some(prior) = current.take() {
                tracing::debug!(superseded = %prior.id, "Abandoned prior playback session");
            }
            *current = Some(PlaybackSession {
                id,
                input_url: input.trim().to_string(),
                media_url: None,
                strategy: None,
                state: PlaybackState::Loading,
                started_at: Utc::now(),
            });
        }
        tracing::info!(session_id = %id, "Loading playback session");

        let media_url = match source {
            StreamSource::Relay(rtsp_url) => match self.relay.start(&rtsp_url).await {
                Ok(()) => self.manifest_url.clone(),
                Err(e) => {
                    self.teardown(id);
                    return Err(e);
                }
            },
            StreamSource::Direct(url) => url,
        };

        let strategy = match select_strategy(&media_url, &self.caps) {
            Ok(strategy) => strategy,
            Err(e) => {
                self.teardown(id);
                return Err(e);
            }
        };

        let mut current = self.current.write();
        match current.as_mut() {
            Some(session) if session.id == id => {
                session.media_url = Some(media_url);
                session.strategy = Some(strategy);
                // Plain file playback needs no readiness signal.
                if strategy == PlaybackStrategy::Native {
                    session.state = PlaybackState::Playing;
                    tracing::info!(session_id = %id, "Playback started");
                }
            }
            _ => {
                tracing::debug!(session_id = %id, "Discarded resolution for superseded session");
            }
        }
        Ok(id)
    }

    /// Feed a media element lifecycle signal to the session it belongs to.
    ///
    /// Returns `true` when the signal started playback. Signals for a
    /// superseded session id are discarded, as are signals that do not match
    /// the session's strategy.
    pub fn signal(&self, session_id: Uuid, signal: MediaSignal) -> bool {
        let mut current = self.current.write();
        let session = match current.as_mut() {
            Some(session) if session.id == session_id => session,
            _ => {
                tracing::debug!(session_id = %session_id, "Discarded signal for superseded session");
                return false;
            }
        };

        let starts = matches!(
            (session.strategy, signal),
            (Some(PlaybackStrategy::Adaptive), MediaSignal::ManifestReady)
                | (Some(PlaybackStrategy::NativeAdaptive), MediaSignal::MetadataLoaded)
        );

        if starts && session.state == PlaybackState::Loading {
            session.state = PlaybackState::Playing;
            tracing::info!(session_id = %session_id, "Playback started");
            true
        } else {
            false
        }
    }

    /// Snapshot of the current session.
    pub fn current_session(&self) -> Option<PlaybackSession> {
        self.current.read().clone()
    }

    /// Current lifecycle state; [`PlaybackState::Idle`] when no session
    /// exists.
    pub fn state(&self) -> PlaybackState {
        self.current
            .read()
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(PlaybackState::Idle)
    }

    /// Drop the session for `id` if it is still current.
    fn teardown(&self, id: Uuid) {
        let mut current = self.current.write();
        if matches!(current.as_ref(), Some(s) if s.id == id) {
            *current = None;
        }
    }
}
