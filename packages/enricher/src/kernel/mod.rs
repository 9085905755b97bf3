//! Kernel module - external services and the infrastructure around them.

pub mod credentials;
pub mod deps;
pub mod search_interest;
pub mod test_dependencies;
pub mod traits;

pub use credentials::{CredentialProvider, SecretString, StaticCredential, TrendsCookieProvider};
pub use deps::{OmdbAdapter, TrendsAdapter};
pub use search_interest::{
    AttemptOutcome, InterestOutcome, SearchInterest, SearchInterestConfig,
};
pub use test_dependencies::{MockMetadataService, MockTrendsService};
pub use traits::*;
