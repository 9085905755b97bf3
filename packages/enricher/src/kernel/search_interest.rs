//! Normalized search interest with bounded retry.
//!
//! Trends only reports interest relative to the other keywords of a query,
//! so every title is compared against a fixed anchor term and scored as
//! `mean(title) / mean(anchor)` over the window. That ratio stays comparable
//! across titles released years apart.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use trends_client::{InterestSeries, TrendsError, TrendsQuery};

use crate::domains::movies::window::Window;
use crate::kernel::BaseTrendsService;

pub const DEFAULT_ANCHOR_TERM: &str = "Feature film";
pub const DEFAULT_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(2500);

/// Configuration for search-interest scoring
#[derive(Debug, Clone)]
pub struct SearchInterestConfig {
    pub anchor_term: String,
    /// Total tries per title, including the first.
    pub attempts: u32,
    /// Fixed pause between tries.
    pub backoff: Duration,
}

impl Default for SearchInterestConfig {
    fn default() -> Self {
        Self {
            anchor_term: DEFAULT_ANCHOR_TERM.to_string(),
            attempts: DEFAULT_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Result of scoring one term.
#[derive(Debug, Clone, PartialEq)]
pub enum InterestOutcome {
    /// A positive ratio against the anchor.
    Measured(f64),
    /// The series was usable but carried nothing to normalize (anchor mean
    /// of zero, title mean of zero, or no points at all).
    NoSignal,
    /// Every try failed.
    Exhausted { attempts: u32, last_error: String },
}

impl InterestOutcome {
    /// The score as a plain number; both non-measured outcomes read as `0.0`.
    pub fn score(&self) -> f64 {
        match self {
            Self::Measured(ratio) => *ratio,
            Self::NoSignal | Self::Exhausted { .. } => 0.0,
        }
    }
}

/// Result of a single try.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(InterestOutcome),
    TransientFailure(TrendsError),
    PermanentFailure(TrendsError),
}

/// Scores terms against the anchor, retrying transient Trends failures.
pub struct SearchInterest {
    trends: Arc<dyn BaseTrendsService>,
    config: SearchInterestConfig,
}

impl SearchInterest {
    pub fn new(trends: Arc<dyn BaseTrendsService>) -> Self {
        Self {
            trends,
            config: SearchInterestConfig::default(),
        }
    }

    pub fn with_config(trends: Arc<dyn BaseTrendsService>, config: SearchInterestConfig) -> Self {
        Self { trends, config }
    }

    /// Normalized interest for `term`, `0.0` when nothing usable came back.
    pub async fn interest(&self, term: &str, window: &Window) -> f64 {
        self.measure(term, window).await.score()
    }

    /// Like [`interest`](Self::interest), but keeps "no signal" and
    /// "could not measure" apart.
    pub async fn measure(&self, term: &str, window: &Window) -> InterestOutcome {
        let attempts = self.config.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.attempt(term, window).await {
                AttemptOutcome::Success(outcome) => return outcome,
                AttemptOutcome::TransientFailure(e) => {
                    tracing::warn!(
                        term,
                        attempt,
                        attempts,
                        error = %e,
                        "Trends request failed"
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        sleep(self.config.backoff).await;
                    }
                }
                AttemptOutcome::PermanentFailure(e) => {
                    tracing::error!(term, attempt, error = %e, "Trends request cannot succeed, giving up");
                    return InterestOutcome::Exhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    };
                }
            }
        }

        InterestOutcome::Exhausted {
            attempts,
            last_error,
        }
    }

    async fn attempt(&self, term: &str, window: &Window) -> AttemptOutcome {
        let anchor = self.config.anchor_term.as_str();
        let query = TrendsQuery::new([term, anchor], window.timeframe());

        match self.trends.interest_over_time(&query).await {
            Ok(series) => match normalize(&series, term, anchor) {
                Ok(outcome) => AttemptOutcome::Success(outcome),
                Err(e) => AttemptOutcome::TransientFailure(e),
            },
            Err(e) if e.is_transient() => AttemptOutcome::TransientFailure(e),
            Err(e) => AttemptOutcome::PermanentFailure(e),
        }
    }
}

/// Ratio of the term's mean interest to the anchor's.
pub fn normalize(
    series: &InterestSeries,
    term: &str,
    anchor: &str,
) -> Result<InterestOutcome, TrendsError> {
    let term_mean = series
        .mean(term)
        .ok_or_else(|| TrendsError::Malformed(format!("no column for {:?}", term)))?;
    let anchor_mean = series
        .mean(anchor)
        .ok_or_else(|| TrendsError::Malformed(format!("no column for {:?}", anchor)))?;

    if anchor_mean == 0.0 {
        return Ok(InterestOutcome::NoSignal);
    }

    let ratio = term_mean / anchor_mean;
    if ratio == 0.0 {
        return Ok(InterestOutcome::NoSignal);
    }
    Ok(InterestOutcome::Measured(ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::movies::window::window;
    use crate::kernel::MockTrendsService;
    use chrono::NaiveDate;
    use tokio::time::Instant;

    fn config(attempts: u32) -> SearchInterestConfig {
        SearchInterestConfig {
            attempts,
            backoff: Duration::ZERO,
            ..Default::default()
        }
    }

    fn release_window() -> Window {
        window(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap())
    }

    #[tokio::test]
    async fn ratio_against_anchor() {
        let trends = Arc::new(MockTrendsService::new().with_means(40, 50));
        let service = SearchInterest::with_config(trends.clone(), config(5));

        let score = service.interest("X Movie", &release_window()).await;

        assert!((score - 0.8).abs() < 1e-9);
        let calls = trends.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].keywords, vec!["X Movie", "Feature film"]);
        assert_eq!(calls[0].timeframe, "2010-01-01 2011-01-01");
        assert_eq!(calls[0].category, 0);
        assert_eq!(calls[0].geo, "");
    }

    #[tokio::test]
    async fn zero_anchor_yields_zero_regardless_of_term() {
        let trends = Arc::new(MockTrendsService::new().with_means(90, 0));
        let service = SearchInterest::with_config(trends, config(5));

        let outcome = service.measure("X Movie", &release_window()).await;

        assert_eq!(outcome, InterestOutcome::NoSignal);
        assert_eq!(outcome.score(), 0.0);
    }

    #[tokio::test]
    async fn retries_transient_failures_then_succeeds() {
        let trends = Arc::new(
            MockTrendsService::new()
                .with_error(TrendsError::RateLimited)
                .with_error(TrendsError::Malformed("short row".into()))
                .with_means(10, 20),
        );
        let service = SearchInterest::with_config(trends.clone(), config(5));

        let outcome = service.measure("X Movie", &release_window()).await;

        assert_eq!(outcome, InterestOutcome::Measured(0.5));
        assert_eq!(trends.calls().len(), 3);
    }

    #[tokio::test]
    async fn exhaustion_returns_zero_instead_of_failing() {
        let trends = Arc::new(MockTrendsService::new().failing_with(|| TrendsError::RateLimited));
        let service = SearchInterest::with_config(trends.clone(), config(3));

        let outcome = service.measure("X Movie", &release_window()).await;

        assert!(matches!(outcome, InterestOutcome::Exhausted { attempts: 3, .. }));
        assert_eq!(outcome.score(), 0.0);
        assert_eq!(trends.calls().len(), 3);
    }

    #[tokio::test]
    async fn permanent_failure_stops_retrying() {
        let trends = Arc::new(
            MockTrendsService::new().failing_with(|| TrendsError::InvalidQuery("blank".into())),
        );
        let service = SearchInterest::with_config(trends.clone(), config(5));

        let score = service.interest("X Movie", &release_window()).await;

        assert_eq!(score, 0.0);
        assert_eq!(trends.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_tries_but_not_after_the_last() {
        let trends = Arc::new(MockTrendsService::new().failing_with(|| TrendsError::RateLimited));
        let service = SearchInterest::with_config(
            trends.clone(),
            SearchInterestConfig {
                attempts: 3,
                ..Default::default()
            },
        );
        let start = Instant::now();

        let outcome = service.measure("X Movie", &release_window()).await;

        let elapsed = start.elapsed();
        assert!(matches!(outcome, InterestOutcome::Exhausted { attempts: 3, .. }));
        assert_eq!(trends.calls().len(), 3);
        assert!(elapsed >= DEFAULT_BACKOFF * 2, "slept {:?}", elapsed);
        assert!(elapsed < DEFAULT_BACKOFF * 3, "slept {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn one_pause_per_failed_try() {
        let backoff = Duration::from_secs(4);
        let trends = Arc::new(
            MockTrendsService::new()
                .with_error(TrendsError::RateLimited)
                .with_means(10, 20),
        );
        let service = SearchInterest::with_config(
            trends,
            SearchInterestConfig {
                attempts: 5,
                backoff,
                ..Default::default()
            },
        );
        let start = Instant::now();

        let outcome = service.measure("X Movie", &release_window()).await;

        let elapsed = start.elapsed();
        assert_eq!(outcome, InterestOutcome::Measured(0.5));
        assert!(elapsed >= backoff && elapsed < backoff * 2, "slept {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn first_try_success_does_not_wait() {
        let trends = Arc::new(MockTrendsService::new().with_means(40, 50));
        let service = SearchInterest::new(trends);
        let start = Instant::now();

        service.measure("X Movie", &release_window()).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn empty_series_is_no_signal() {
        let series = InterestSeries::new(vec!["a".into(), "b".into()], vec![]).unwrap();
        assert_eq!(normalize(&series, "a", "b").unwrap(), InterestOutcome::NoSignal);
    }

    #[test]
    fn missing_column_is_malformed() {
        let series = InterestSeries::new(vec!["a".into()], vec![]).unwrap();
        assert!(normalize(&series, "a", "b").is_err());
    }
}
