//! Sync client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Live blog not found: {0}")]
    NotFound(String),

    /// The server answered with a problem document.
    #[error("{title} ({status}): {detail}")]
    Api {
        status: u16,
        title: String,
        detail: String,
    },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}
