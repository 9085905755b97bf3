// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation, windowing and normalization live in domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMetadataService)

use async_trait::async_trait;
use trends_client::{InterestSeries, TrendsQuery};

use crate::domains::movies::models::RawMetadata;

// =============================================================================
// Metadata Service Trait (Infrastructure - movie attributes)
// =============================================================================

#[async_trait]
pub trait BaseMetadataService: Send + Sync {
    /// Fetch raw attributes for a title.
    ///
    /// Never fails: an unreachable or confused API yields a `RawMetadata`
    /// with every field absent, which validation then rejects.
    async fn fetch(&self, title: &str) -> RawMetadata;
}

// =============================================================================
// Trends Service Trait (Infrastructure - relative search interest)
// =============================================================================

#[async_trait]
pub trait BaseTrendsService: Send + Sync {
    /// One interest-over-time request. Retry policy belongs to the caller,
    /// which needs the typed error to tell transient from permanent failures.
    async fn interest_over_time(&self, query: &TrendsQuery)
        -> trends_client::Result<InterestSeries>;
}
