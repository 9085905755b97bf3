//! CSV-backed master store.
//!
//! Rows are read back as raw string cells so that rows written by other tools
//! survive a merge untouched, whatever their encoding. Writes go to a temporary file in the target
//! directory which is then renamed over the master, so a reader never sees a
//! half-written file.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{decode_cell, known_titles, merge_rows, MergeReport, RecordStore, StoreError};
use crate::domains::movies::models::{EnrichedRecord, MASTER_COLUMNS};

pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every data row, header excluded. A missing file has no rows.
    pub fn load_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let mut reader = match csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
        {
            Ok(reader) => reader,
            Err(e) if is_not_found(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            rows.push(record.iter().map(decode_cell).collect());
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(tmp.as_file_mut());
            writer.write_record(MASTER_COLUMNS)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn is_not_found(error: &csv::Error) -> bool {
    matches!(error.kind(), csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound)
}

impl RecordStore for CsvRecordStore {
    fn load_known_titles(&self) -> HashSet<String> {
        match self.load_rows() {
            Ok(rows) => known_titles(&rows),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Master store unreadable, treating every title as new"
                );
                HashSet::new()
            }
        }
    }

    fn merge_and_persist(&self, staged: &[EnrichedRecord]) -> Result<Option<MergeReport>, StoreError> {
        if staged.is_empty() {
            return Ok(None);
        }

        // Re-read right before writing to pick up rows added since the run began.
        let mut rows = self.load_rows()?;
        if rows.is_empty() {
            tracing::info!(path = %self.path.display(), "No existing master rows, creating new master file");
        }

        let report = merge_rows(&mut rows, staged);
        self.write_rows(&rows)?;

        tracing::info!(
            path = %self.path.display(),
            existing = report.existing,
            appended = report.appended,
            skipped_duplicates = report.skipped_duplicates,
            "Master store saved"
        );
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::record;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CsvRecordStore {
        CsvRecordStore::new(dir.path().join("processed").join("movies_master.csv"))
    }

    #[test]
    fn missing_store_has_no_known_titles() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.load_known_titles().is_empty());
        assert!(store.load_rows().unwrap().is_empty());
    }

    #[test]
    fn empty_merge_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.merge_and_persist(&[]).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn first_merge_creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.merge_and_persist(&[record("X", 0.8)]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Title,Year,Runtime (mins),IMDb Rating,IMDb Votes,Box Office ($),Age Rating,Google Interest")
        );
        assert_eq!(lines.next(), Some("X,2010,120,7.5,500,1000000,PG,0.8"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn merge_appends_after_existing_rows() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.merge_and_persist(&[record("A", 0.1)]).unwrap();

        let report = store
            .merge_and_persist(&[record("B", 0.2), record("C", 0.3)])
            .unwrap()
            .unwrap();

        assert_eq!(report.existing, 1);
        assert_eq!(report.appended, 2);
        let titles: Vec<String> = store
            .load_rows()
            .unwrap()
            .into_iter()
            .map(|row| row[0].clone())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn merge_rereads_rows_written_by_others() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            "Title,Year,Runtime (mins),IMDb Rating,IMDb Votes,Box Office ($),Age Rating,Google Interest\n\
             \" Heat \",2008,170,8.3,700000,67436818,R,1.25\n",
        )
        .unwrap();

        let known = store.load_known_titles();
        assert!(known.contains("Heat"));

        // Another writer appends a row between load and merge.
        let mut text = fs::read_to_string(store.path()).unwrap();
        text.push_str("Late,2012,90,6.0,10,5000,PG,0.4\n");
        fs::write(store.path(), text).unwrap();

        let report = store
            .merge_and_persist(&[record("Late", 0.5), record("New", 0.6)])
            .unwrap()
            .unwrap();

        assert_eq!(report.existing, 2);
        assert_eq!(report.appended, 1);
        assert_eq!(report.skipped_duplicates, 1);

        let rows = store.load_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], " Heat ");
        assert_eq!(rows[1][7], "0.4");
        assert_eq!(rows[2][0], "New");
    }

    #[test]
    fn latin1_row_keeps_every_title_known() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let mut bytes = b"Title,Year,Runtime (mins),IMDb Rating,IMDb Votes,Box Office ($),Age Rating,Google Interest\n".to_vec();
        bytes.extend_from_slice(b"Heat,1995,170,8.3,700000,187436818,R,0.5\n");
        bytes.extend_from_slice(b"Am\xe9lie,2001,122,8.3,780000,33225499,R,0.7\n");
        fs::write(store.path(), bytes).unwrap();

        let known = store.load_known_titles();
        assert!(known.contains("Heat"));
        assert!(known.contains("Amélie"));

        let report = store.merge_and_persist(&[record("X", 0.8)]).unwrap().unwrap();
        assert_eq!(report.existing, 2);
        assert_eq!(report.appended, 1);

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\nHeat,1995,170,8.3,700000,187436818,R,0.5\n"));
        assert!(text.contains("\nAmélie,2001,122,8.3,780000,33225499,R,0.7\n"));
    }

    #[test]
    fn unreadable_store_reads_as_empty_but_blocks_merge() {
        let dir = TempDir::new().unwrap();
        let store = CsvRecordStore::new(dir.path());

        assert!(store.load_known_titles().is_empty());
        assert!(store.merge_and_persist(&[record("X", 0.8)]).is_err());
    }
}
