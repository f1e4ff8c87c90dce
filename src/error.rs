//! Error types for archive fetching.

use thiserror::Error;

/// Errors that can occur while loading an archive page.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Failed to reach the content API or read its response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but has no `docs` array.
    #[error("Malformed archive response: {0}")]
    MalformedBody(String),

    /// The configured server URL cannot be joined with the endpoint path.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ArchiveError {
    /// Whether this error is the shape-check failure rather than a transport
    /// or decode failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ArchiveError::MalformedBody(_))
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
