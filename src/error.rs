//! Common error types used throughout overcast.
//!
//! This module provides a unified error type covering client-side validation,
//! overlay store transport failures, and playback capability failures. Every
//! failure is consumed at the call site that produced it; nothing here is
//! fatal to the process.

/// Common error type for overcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Overlay text was empty or whitespace-only. Rejected before any
    /// network call is made.
    #[error("Overlay text cannot be empty")]
    EmptyText,

    /// Overlay dimensions must stay positive.
    #[error("Overlay size must be positive")]
    InvalidSize,

    /// The input string is neither an RTSP nor an HTTP(S) URL.
    #[error("Not a valid RTSP or HTTP URL: {0}")]
    InvalidSource(String),

    /// No playback strategy can handle the resolved media URL.
    #[error("Unsupported stream type: {0}")]
    Unsupported(String),

    /// A CRUD call against the overlay store failed.
    #[error("Overlay store unavailable: {0}")]
    StoreUnavailable(String),

    /// The relay endpoint failed to start transcoding.
    #[error("Failed to start relay stream: {0}")]
    RelayStart(String),

    /// No overlay with the given identifier exists in the collection.
    #[error("Overlay not found: {0}")]
    OverlayNotFound(String),

    /// A modify draft is already open for another overlay.
    #[error("A draft is already open for overlay {0}")]
    DraftOpen(String),

    /// No modify draft is currently open.
    #[error("No draft is open")]
    NoDraft,

    /// No delete is awaiting confirmation.
    #[error("No delete confirmation is pending")]
    NoPendingDelete,
}

impl Error {
    /// Create a new InvalidSource error.
    pub fn invalid_source<S: Into<String>>(input: S) -> Self {
        Self::InvalidSource(input.into())
    }

    /// Create a new Unsupported error.
    pub fn unsupported<S: Into<String>>(url: S) -> Self {
        Self::Unsupported(url.into())
    }

    /// Create a new StoreUnavailable error.
    pub fn store_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Create a new RelayStart error.
    pub fn relay_start<S: Into<String>>(msg: S) -> Self {
        Self::RelayStart(msg.into())
    }

    /// Create a new OverlayNotFound error.
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::OverlayNotFound(id.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
