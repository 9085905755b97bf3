// Movie Enricher - Core
//
// This crate enriches candidate movie titles with OMDb metadata and a
// normalized Google Trends interest score, then appends accepted titles to a
// deduplicated master CSV that grows across runs.

pub mod candidates;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod store;

pub use config::*;
