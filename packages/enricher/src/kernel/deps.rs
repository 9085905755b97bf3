//! Adapters from the pure API clients to the kernel traits.

use async_trait::async_trait;
use omdb_client::OmdbClient;
use trends_client::{InterestSeries, TrendsClient, TrendsQuery};

use crate::domains::movies::models::RawMetadata;
use crate::kernel::{BaseMetadataService, BaseTrendsService};

// =============================================================================
// OmdbClient Adapter (implements BaseMetadataService trait)
// =============================================================================

/// Wrapper around OmdbClient that implements BaseMetadataService trait
pub struct OmdbAdapter(pub OmdbClient);

impl OmdbAdapter {
    pub fn new(client: OmdbClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseMetadataService for OmdbAdapter {
    async fn fetch(&self, title: &str) -> RawMetadata {
        match self.0.fetch_by_title(title).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(title, error = %e, "OMDb lookup failed, treating all fields as unknown");
                RawMetadata::default()
            }
        }
    }
}

// =============================================================================
// TrendsClient Adapter (implements BaseTrendsService trait)
// =============================================================================

/// Wrapper around TrendsClient that implements BaseTrendsService trait
pub struct TrendsAdapter(pub TrendsClient);

impl TrendsAdapter {
    pub fn new(client: TrendsClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseTrendsService for TrendsAdapter {
    async fn interest_over_time(
        &self,
        query: &TrendsQuery,
    ) -> trends_client::Result<InterestSeries> {
        self.0.interest_over_time(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn omdb_failures_become_empty_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let adapter =
            OmdbAdapter::new(OmdbClient::new("k").with_base_url(format!("{}/", server.uri())));
        let raw = adapter.fetch("Heat").await;

        assert_eq!(raw, RawMetadata::default());
    }
}
