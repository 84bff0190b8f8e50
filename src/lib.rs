//! Overcast - overlay synchronization and stream-source resolution engine.
//!
//! Keeps a local view of remotely stored text overlays consistent under
//! interactive mutation, and resolves arbitrary user-supplied URLs into a
//! concrete playback strategy for the hosting media element.

pub mod config;
pub mod error;
pub mod overlay;
pub mod playback;

pub use error::{Error, Result};
