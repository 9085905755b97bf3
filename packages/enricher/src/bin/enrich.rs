use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enricher_core::candidates::read_candidate_titles;
use enricher_core::domains::movies::Pipeline;
use enricher_core::kernel::{CredentialProvider, OmdbAdapter, SearchInterest, TrendsAdapter};
use enricher_core::store::CsvRecordStore;
use enricher_core::Config;
use omdb_client::OmdbClient;
use trends_client::TrendsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,enricher_core=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting movie enricher");

    let config = Config::from_env().context("Failed to load configuration")?;

    let cookie = config
        .credential_provider()
        .acquire()
        .await
        .context("Failed to obtain a Trends session cookie")?;

    let titles = read_candidate_titles(&config.candidates_path)?;

    let omdb = OmdbClient::new(config.omdb_api_key.expose())
        .with_base_url(config.omdb_base_url.clone());
    let trends = TrendsClient::new(cookie.expose())
        .with_base_url(config.trends_base_url.clone());

    let interest = SearchInterest::with_config(
        Arc::new(TrendsAdapter::new(trends)),
        config.search_interest(),
    );
    let pipeline = Pipeline::new(Arc::new(OmdbAdapter::new(omdb)), interest);
    let store = CsvRecordStore::new(config.master_path.clone());

    let summary = pipeline
        .run(titles, &store)
        .await
        .with_context(|| format!("Failed to update {}", config.master_path.display()))?;

    match summary.merge {
        Some(report) => tracing::info!(
            existing = report.existing,
            appended = report.appended,
            skipped_duplicates = report.skipped_duplicates,
            path = %store.path().display(),
            "Master updated"
        ),
        None => tracing::info!("Master left unchanged"),
    }

    Ok(())
}
