//! In-memory record store for testing and development.

use std::collections::HashSet;
use std::sync::RwLock;

use super::{known_titles, merge_rows, MergeReport, RecordStore, StoreError};
use crate::domains::movies::models::EnrichedRecord;

/// Rows held in memory, plus a count of persists for assertions.
///
/// Not suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    rows: RwLock<Vec<Vec<String>>>,
    writes: RwLock<usize>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing titles (other columns left blank).
    pub fn with_titles<'a>(titles: impl IntoIterator<Item = &'a str>) -> Self {
        let store = Self::new();
        store.rows.write().unwrap().extend(
            titles
                .into_iter()
                .map(|t| vec![t.to_string(), String::new()]),
        );
        store
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.read().unwrap().clone()
    }

    /// How many times the store was persisted.
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_known_titles(&self) -> HashSet<String> {
        known_titles(&self.rows.read().unwrap())
    }

    fn merge_and_persist(&self, staged: &[EnrichedRecord]) -> Result<Option<MergeReport>, StoreError> {
        if staged.is_empty() {
            return Ok(None);
        }

        let mut rows = self.rows.write().unwrap();
        let report = merge_rows(&mut rows, staged);
        *self.writes.write().unwrap() += 1;
        Ok(Some(report))
    }
}
