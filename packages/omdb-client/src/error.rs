//! Error types for the OMDb client.

use thiserror::Error;

/// Result type for OMDb client operations.
pub type Result<T> = std::result::Result<T, OmdbError>;

/// OMDb client errors.
#[derive(Debug, Error)]
pub enum OmdbError {
    /// Network error (connection failed, timeout, body read failed)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered `"Response": "False"` (unknown title, bad key, ...)
    #[error("not found: {0}")]
    NotFound(String),

    /// Body was not the expected JSON shape
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
