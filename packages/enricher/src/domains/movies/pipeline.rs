//! Per-title enrichment and the end-of-run merge.
//!
//! Each candidate runs through a fixed sequence and ends in exactly one
//! terminal state:
//!
//! 1. already known → `SkippedKnown`
//! 2. fetch OMDb metadata
//! 3. validate → `RejectedMetadata`
//! 4. release-date eligibility → `RejectedWindow`
//! 5. score `"<title> Movie"` against the anchor → `RejectedNoSignal`
//! 6. attach the score → `Accepted`, staged for the merge
//!
//! Titles are processed one after another; the store is merged and persisted
//! once, after every title is done.

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::EnrichedRecord;
use super::validation::{validate, Rejection};
use super::window::{cutoff, eligible, window};
use crate::kernel::search_interest::{InterestOutcome, SearchInterest};
use crate::kernel::BaseMetadataService;
use crate::store::{MergeReport, RecordStore, StoreError};

/// Terminal state of one candidate title.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleOutcome {
    Accepted(EnrichedRecord),
    SkippedKnown,
    RejectedMetadata(Rejection),
    RejectedWindow {
        release_date: NaiveDate,
        cutoff: NaiveDate,
    },
    RejectedNoSignal(InterestOutcome),
}

/// Mutable state of one run, passed in and handed back explicitly.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Titles already in the store when the run started.
    pub known: HashSet<String>,
    /// Candidates handled earlier in this run, whatever their outcome.
    pub seen: HashSet<String>,
    /// Accepted records awaiting the merge, in acceptance order.
    pub staged: Vec<EnrichedRecord>,
}

impl RunState {
    pub fn new(known: HashSet<String>) -> Self {
        Self {
            known,
            ..Default::default()
        }
    }

    pub fn is_known(&self, title: &str) -> bool {
        let title = title.trim();
        self.known.contains(title) || self.seen.contains(title)
    }
}

/// Counts per terminal state, plus what the merge did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    pub accepted: usize,
    pub skipped_known: usize,
    pub rejected_metadata: usize,
    pub rejected_window: usize,
    pub rejected_no_signal: usize,
    /// `None` when nothing was staged and the store was left alone.
    pub merge: Option<MergeReport>,
}

impl RunSummary {
    fn record(&mut self, outcome: &TitleOutcome) {
        self.processed += 1;
        match outcome {
            TitleOutcome::Accepted(_) => self.accepted += 1,
            TitleOutcome::SkippedKnown => self.skipped_known += 1,
            TitleOutcome::RejectedMetadata(_) => self.rejected_metadata += 1,
            TitleOutcome::RejectedWindow { .. } => self.rejected_window += 1,
            TitleOutcome::RejectedNoSignal(_) => self.rejected_no_signal += 1,
        }
    }
}

pub struct Pipeline {
    metadata: Arc<dyn BaseMetadataService>,
    interest: SearchInterest,
    today: NaiveDate,
}

impl Pipeline {
    pub fn new(metadata: Arc<dyn BaseMetadataService>, interest: SearchInterest) -> Self {
        Self {
            metadata,
            interest,
            today: Local::now().date_naive(),
        }
    }

    /// Evaluate eligibility as of `today` instead of the wall clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run one candidate through every step. Does not touch `state`.
    pub async fn process_title(&self, title: &str, state: &RunState) -> TitleOutcome {
        let title = title.trim();
        info!(title, "Processing movie");

        if state.is_known(title) {
            info!(title, "Skipping movie already in master");
            return TitleOutcome::SkippedKnown;
        }

        let raw = self.metadata.fetch(title).await;
        let movie = match validate(&raw) {
            Ok(movie) => movie,
            Err(rejection) => {
                info!(title, reason = %rejection, "Skipping movie with incomplete or invalid data");
                return TitleOutcome::RejectedMetadata(rejection);
            }
        };

        let cutoff = cutoff(self.today);
        if !eligible(movie.release_date, self.today) {
            info!(
                title,
                release_date = %movie.release_date,
                %cutoff,
                "Skipping movie released after the cutoff date"
            );
            return TitleOutcome::RejectedWindow {
                release_date: movie.release_date,
                cutoff,
            };
        }

        let search_term = format!("{} Movie", title);
        let window = window(movie.release_date);
        let outcome = self.interest.measure(&search_term, &window).await;

        if let InterestOutcome::Measured(score) = outcome {
            info!(title, %search_term, score, "Appended data");
            return TitleOutcome::Accepted(movie.with_interest(score));
        }

        match &outcome {
            InterestOutcome::Exhausted { attempts, last_error } => warn!(
                title,
                %search_term,
                attempts,
                %last_error,
                "Search interest unavailable after retries, skipping"
            ),
            _ => info!(title, %search_term, %window, "No search interest data, skipping"),
        }
        TitleOutcome::RejectedNoSignal(outcome)
    }

    /// Process every candidate in order, threading `state` through.
    pub async fn enrich<I, S>(&self, titles: I, mut state: RunState) -> (RunState, RunSummary)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = RunSummary::default();

        for title in titles {
            let title = title.as_ref().trim();
            if title.is_empty() {
                continue;
            }

            let outcome = self.process_title(title, &state).await;
            summary.record(&outcome);

            if outcome != TitleOutcome::SkippedKnown {
                state.seen.insert(title.to_string());
            }
            if let TitleOutcome::Accepted(record) = outcome {
                state.staged.push(record);
            }
        }

        (state, summary)
    }

    /// Load known titles, enrich every candidate, then merge once.
    pub async fn run<I, S>(&self, titles: I, store: &dyn RecordStore) -> Result<RunSummary, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known = store.load_known_titles();
        info!(known = known.len(), "Loaded master titles");

        let (state, mut summary) = self.enrich(titles, RunState::new(known)).await;

        if state.staged.is_empty() {
            info!("No movies were processed successfully");
        } else {
            summary.merge = store.merge_and_persist(&state.staged)?;
        }

        info!(
            processed = summary.processed,
            accepted = summary.accepted,
            skipped_known = summary.skipped_known,
            rejected_metadata = summary.rejected_metadata,
            rejected_window = summary.rejected_window,
            rejected_no_signal = summary.rejected_no_signal,
            "Run complete"
        );
        Ok(summary)
    }
}
