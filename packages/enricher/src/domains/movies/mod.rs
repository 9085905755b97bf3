//! Movies domain: turning a candidate title into an enriched master record.
//!
//! - [`models`] - raw and enriched record shapes
//! - [`validation`] - inclusion rules for raw OMDb attributes
//! - [`window`] - release-date eligibility and the Trends query window
//! - [`pipeline`] - per-title state machine and the end-of-run merge

pub mod models;
pub mod pipeline;
pub mod validation;
pub mod window;

pub use models::{EnrichedRecord, RawMetadata, ValidatedMovie, MASTER_COLUMNS};
pub use pipeline::{Pipeline, RunState, RunSummary, TitleOutcome};
pub use validation::{validate, Rejection};
pub use window::{cutoff, eligible, window, Window};
