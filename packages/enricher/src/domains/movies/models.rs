use chrono::NaiveDate;

/// Raw, string-valued OMDb attributes for one title.
pub type RawMetadata = omdb_client::TitleDetails;

/// Master store header, in column order. `Title` is the dedup key.
pub const MASTER_COLUMNS: [&str; 8] = [
    "Title",
    "Year",
    "Runtime (mins)",
    "IMDb Rating",
    "IMDb Votes",
    "Box Office ($)",
    "Age Rating",
    "Google Interest",
];

/// A title that passed every inclusion rule but has no interest score yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMovie {
    pub title: String,
    pub year: i32,
    /// 0 when OMDb does not know the runtime.
    pub runtime_minutes: u32,
    /// IMDb score as reported, or `"N/A"`.
    pub rating: String,
    pub vote_count: u64,
    pub box_office: u64,
    pub release_date: NaiveDate,
    pub age_rating: String,
}

impl ValidatedMovie {
    /// Attach a search-interest score, producing the final record.
    pub fn with_interest(self, search_interest: f64) -> EnrichedRecord {
        EnrichedRecord {
            title: self.title,
            year: self.year,
            runtime_minutes: self.runtime_minutes,
            rating: self.rating,
            vote_count: self.vote_count,
            box_office: self.box_office,
            release_date: self.release_date,
            age_rating: self.age_rating,
            search_interest,
        }
    }
}

/// One accepted title, as appended to the master store.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub title: String,
    pub year: i32,
    pub runtime_minutes: u32,
    pub rating: String,
    pub vote_count: u64,
    pub box_office: u64,
    /// Used for windowing only; not a master column.
    pub release_date: NaiveDate,
    pub age_rating: String,
    pub search_interest: f64,
}

impl EnrichedRecord {
    /// Cells in `MASTER_COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.year.to_string(),
            self.runtime_minutes.to_string(),
            self.rating.clone(),
            self.vote_count.to_string(),
            self.box_office.to_string(),
            self.age_rating.clone(),
            self.search_interest.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_follows_master_columns() {
        let record = ValidatedMovie {
            title: "X".into(),
            year: 2010,
            runtime_minutes: 120,
            rating: "7.5".into(),
            vote_count: 500,
            box_office: 1_000_000,
            release_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            age_rating: "PG".into(),
        }
        .with_interest(0.8);

        let row = record.to_row();
        assert_eq!(row.len(), MASTER_COLUMNS.len());
        assert_eq!(
            row,
            vec!["X", "2010", "120", "7.5", "500", "1000000", "PG", "0.8"]
        );
    }
}
