//! Pure OMDb REST API client.
//!
//! A minimal client for the OMDb movie-data API. Supports looking up a single
//! title by free-text name and returning its raw, string-valued attributes.
//!
//! # Example
//!
//! ```rust,ignore
//! use omdb_client::OmdbClient;
//!
//! let client = OmdbClient::new("your-api-key");
//!
//! let details = client.fetch_by_title("Inception").await?;
//! println!("{}", details.box_office.as_deref().unwrap_or("N/A"));
//! ```

pub mod error;
pub mod types;

pub use error::{OmdbError, Result};
pub use types::{known, TitleDetails, NOT_AVAILABLE};

const BASE_URL: &str = "http://www.omdbapi.com/";

#[derive(Clone)]
pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (mirrors, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Look up one title. One request per call, no retry.
    pub async fn fetch_by_title(&self, title: &str) -> Result<TitleDetails> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OmdbError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let details: TitleDetails = serde_json::from_str(&body)?;

        if details.is_failure() {
            let reason = details
                .error
                .clone()
                .unwrap_or_else(|| "lookup failed".to_string());
            tracing::debug!(title, %reason, "OMDb lookup returned no result");
            return Err(OmdbError::NotFound(reason));
        }

        Ok(details)
    }
}
