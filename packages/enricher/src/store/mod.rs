//! Master record store.
//!
//! The store is append-only: titles already present are never rewritten,
//! and new records are appended in the order they were staged.
//!
//! - `CsvRecordStore`: the on-disk master file
//! - `MemoryRecordStore`: in-process store for tests

pub mod csv_store;
pub mod memory;

pub use csv_store::CsvRecordStore;
pub use memory::MemoryRecordStore;

use std::collections::HashSet;
use thiserror::Error;

use crate::domains::movies::models::EnrichedRecord;

/// Errors raised while reading back or writing the master store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of a merge that actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// Rows already in the store before the merge.
    pub existing: usize,
    pub appended: usize,
    /// Staged rows dropped because their title was already present.
    pub skipped_duplicates: usize,
}

pub trait RecordStore: Send + Sync {
    /// Trimmed titles of every stored row. A missing or unreadable store
    /// reads as empty.
    fn load_known_titles(&self) -> HashSet<String>;

    /// Re-read the store, append `staged`, and persist. Writes nothing and
    /// returns `None` when `staged` is empty.
    fn merge_and_persist(&self, staged: &[EnrichedRecord]) -> Result<Option<MergeReport>, StoreError>;
}

/// Text of one raw CSV cell. Bytes that are not UTF-8 are read as Latin-1,
/// the usual encoding of spreadsheet exports, so every byte maps to a char.
pub fn decode_cell(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Dedup key of a stored row.
pub fn row_title(row: &[String]) -> Option<&str> {
    row.first().map(|cell| cell.trim()).filter(|t| !t.is_empty())
}

pub fn known_titles(rows: &[Vec<String>]) -> HashSet<String> {
    rows.iter()
        .filter_map(|row| row_title(row))
        .map(str::to_string)
        .collect()
}

/// Append `staged` to `rows`, skipping titles already present.
pub fn merge_rows(rows: &mut Vec<Vec<String>>, staged: &[EnrichedRecord]) -> MergeReport {
    let mut seen = known_titles(rows);
    let mut report = MergeReport {
        existing: rows.len(),
        ..Default::default()
    };

    for record in staged {
        let title = record.title.trim();
        if !seen.insert(title.to_string()) {
            tracing::warn!(title, "Title already in master store, not appending");
            report.skipped_duplicates += 1;
            continue;
        }
        rows.push(record.to_row());
        report.appended += 1;
    }

    report
}
