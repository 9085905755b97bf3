//! Candidate title list.
//!
//! A CSV file with a `title` column (any case). Files without one use their
//! first column.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::store::decode_cell;

const TITLE_COLUMN: &str = "title";

/// Trimmed, non-empty, first-occurrence-only titles from `path`.
pub fn read_candidate_titles(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open candidate titles at {}", path.display()))?;

    let column = reader
        .byte_headers()
        .context("Failed to read candidate header row")?
        .iter()
        .position(|h| decode_cell(h).trim().eq_ignore_ascii_case(TITLE_COLUMN))
        .unwrap_or(0);

    let mut seen = HashSet::new();
    let mut titles = Vec::new();
    for (line, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Bad candidate row {}", line + 2))?;
        let Some(cell) = record.get(column).map(decode_cell) else {
            continue;
        };
        let title = cell.trim();
        if title.is_empty() {
            continue;
        }
        if seen.insert(title.to_string()) {
            titles.push(title.to_string());
        }
    }

    tracing::info!(path = %path.display(), count = titles.len(), "Loaded candidate titles");
    Ok(titles)
}
