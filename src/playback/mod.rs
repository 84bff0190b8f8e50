//! Playback subsystem.
//!
//! Turns a raw user-supplied URL into a playing media session:
//!
//! 1. [`source`] classifies the input as a relay request (RTSP) or a direct
//!    HTTP(S) URL.
//! 2. [`relay`] asks the backend transcoder to publish RTSP feeds at the
//!    fixed manifest slot.
//! 3. [`strategy`] picks how the resolved media URL is driven through the
//!    platform's media element.
//! 4. [`session`] tracks the `Idle -> Loading -> Playing` lifecycle and
//!    discards results from superseded requests.

pub mod relay;
pub mod session;
pub mod source;
pub mod strategy;

pub use relay::{HttpRelayClient, RelayClient};
pub use session::{MediaSignal, PlaybackController, PlaybackSession, PlaybackState};
pub use source::StreamSource;
pub use strategy::{select_strategy, PlatformCapabilities, PlaybackStrategy};
