//! Error types for the scan pipeline
//!
//! A missing element or field is never an error: strategies return `None`
//! and the caller falls through to the next strategy or a default.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    /// A candidate unit could not be read back from its page.
    #[error("candidate unit from `{origin}` is no longer readable")]
    UnreadableUnit { origin: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Out-of-band page fetch failed (network, HTTP status, body read).
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
