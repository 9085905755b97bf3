//! Error types for the trends client.

use thiserror::Error;

/// Result type for trends client operations.
pub type Result<T> = std::result::Result<T, TrendsError>;

/// Trends client errors.
#[derive(Debug, Error)]
pub enum TrendsError {
    /// Network error (connection failed, timeout, body read failed)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429
    #[error("rate limited by trends API")]
    RateLimited,

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Body was JSON but not the shape we index into
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Body was not JSON
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The query can never succeed as built
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// No session cookie could be obtained
    #[error("no session cookie in response")]
    MissingCookie,
}

impl TrendsError {
    /// Whether repeating the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidQuery(_) | Self::MissingCookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_failures_are_transient() {
        assert!(TrendsError::RateLimited.is_transient());
        assert!(TrendsError::Api {
            status: 500,
            message: String::new()
        }
        .is_transient());
        assert!(TrendsError::Malformed("no widget".into()).is_transient());
    }

    #[test]
    fn construction_failures_are_permanent() {
        assert!(!TrendsError::InvalidQuery("empty".into()).is_transient());
        assert!(!TrendsError::MissingCookie.is_transient());
    }
}
