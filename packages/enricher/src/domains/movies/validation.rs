//! Inclusion rules for raw OMDb attributes.
//!
//! Rules run in a fixed order and stop at the first failure. Absent fields
//! are treated exactly like the `"N/A"` sentinel.

use chrono::NaiveDate;
use omdb_client::{known, NOT_AVAILABLE};
use thiserror::Error;

use super::models::{RawMetadata, ValidatedMovie};

/// Titles released in or before this year are out of scope.
pub const LAST_EXCLUDED_YEAR: i32 = 2006;

/// OMDb `Released` format, e.g. `15 Jun 2018`.
pub const RELEASE_DATE_FORMAT: &str = "%d %b %Y";

/// Why a title was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("year {0:?} is not a number")]
    YearUnparseable(String),

    #[error("released in {0}, not after 2006")]
    YearTooEarly(i32),

    #[error("release date unknown")]
    ReleaseDateUnknown,

    #[error("release date {0:?} is not in \"DD Mon YYYY\" form")]
    ReleaseDateUnparseable(String),

    #[error("box office unknown")]
    BoxOfficeUnknown,

    #[error("box office {0:?} is not a whole amount")]
    BoxOfficeUnparseable(String),

    #[error("box office {0} is not positive")]
    BoxOfficeNotPositive(i64),

    #[error("title unknown")]
    TitleUnknown,
}

/// Apply every inclusion rule to `raw`.
pub fn validate(raw: &RawMetadata) -> Result<ValidatedMovie, Rejection> {
    let year = parse_year(raw.year.as_deref())?;
    let release_date = parse_release_date(raw.released.as_deref())?;
    let box_office = parse_box_office(raw.box_office.as_deref())?;
    let vote_count = parse_vote_count(raw.imdb_votes.as_deref());
    let runtime_minutes = parse_runtime(raw.runtime.as_deref());
    let title = known(raw.title.as_deref())
        .ok_or(Rejection::TitleUnknown)?
        .to_string();

    Ok(ValidatedMovie {
        title,
        year,
        runtime_minutes,
        rating: or_sentinel(raw.imdb_rating.as_deref()),
        vote_count,
        box_office,
        release_date,
        age_rating: or_sentinel(raw.rated.as_deref()),
    })
}

fn parse_year(value: Option<&str>) -> Result<i32, Rejection> {
    let text = value.map(str::trim).unwrap_or(NOT_AVAILABLE);
    let year: i32 = text
        .parse()
        .map_err(|_| Rejection::YearUnparseable(text.to_string()))?;
    if year <= LAST_EXCLUDED_YEAR {
        return Err(Rejection::YearTooEarly(year));
    }
    Ok(year)
}

fn parse_release_date(value: Option<&str>) -> Result<NaiveDate, Rejection> {
    let text = known(value).ok_or(Rejection::ReleaseDateUnknown)?;
    NaiveDate::parse_from_str(text, RELEASE_DATE_FORMAT)
        .map_err(|_| Rejection::ReleaseDateUnparseable(text.to_string()))
}

fn parse_box_office(value: Option<&str>) -> Result<u64, Rejection> {
    let text = known(value).ok_or(Rejection::BoxOfficeUnknown)?;
    let digits: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let amount: i64 = digits
        .trim()
        .parse()
        .map_err(|_| Rejection::BoxOfficeUnparseable(text.to_string()))?;
    if amount <= 0 {
        return Err(Rejection::BoxOfficeNotPositive(amount));
    }
    Ok(amount as u64)
}

fn parse_vote_count(value: Option<&str>) -> u64 {
    known(value)
        .and_then(|text| text.replace(',', "").parse().ok())
        .unwrap_or(0)
}

fn parse_runtime(value: Option<&str>) -> u32 {
    known(value)
        .filter(|text| text.contains("min"))
        .and_then(|text| text.replace("min", "").trim().parse().ok())
        .unwrap_or(0)
}

fn or_sentinel(value: Option<&str>) -> String {
    known(value).unwrap_or(NOT_AVAILABLE).to_string()
}
