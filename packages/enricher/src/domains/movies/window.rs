//! Release-date eligibility and the Trends query window.
//!
//! A title is only scored once a full year of post-release interest exists,
//! measured from the first day of the current month.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// Length of the interest window and of the eligibility lag.
pub const SIGNAL_WINDOW_DAYS: i64 = 365;

/// Inclusive date range sent to Trends as `"YYYY-MM-DD YYYY-MM-DD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn timeframe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

pub fn current_month_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.day0()))
}

/// Latest release date that still has a full year of signal behind it.
pub fn cutoff(today: NaiveDate) -> NaiveDate {
    current_month_start(today) - Duration::days(SIGNAL_WINDOW_DAYS)
}

pub fn eligible(release_date: NaiveDate, today: NaiveDate) -> bool {
    release_date <= cutoff(today)
}

pub fn window(release_date: NaiveDate) -> Window {
    Window {
        start: release_date,
        end: release_date + Duration::days(SIGNAL_WINDOW_DAYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_start_resets_day() {
        assert_eq!(current_month_start(date(2024, 3, 17)), date(2024, 3, 1));
        assert_eq!(current_month_start(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn cutoff_is_365_days_before_month_start() {
        // 2024 is a leap year: 2024-03-01 minus 365 days is 2023-03-02.
        assert_eq!(cutoff(date(2024, 3, 17)), date(2023, 3, 2));
        assert_eq!(cutoff(date(2023, 6, 30)), date(2022, 6, 1));
    }

    #[test]
    fn release_on_cutoff_is_eligible() {
        let today = date(2023, 6, 30);
        assert!(eligible(date(2022, 6, 1), today));
        assert!(!eligible(date(2022, 6, 2), today));
        assert!(eligible(date(2010, 1, 1), today));
    }

    #[test]
    fn recent_release_is_not_eligible() {
        let today = date(2023, 6, 30);
        let release = current_month_start(today) - Duration::days(200);
        assert!(!eligible(release, today));
    }

    #[test]
    fn window_spans_a_year_from_release() {
        let w = window(date(2018, 6, 15));
        assert_eq!(w.start, date(2018, 6, 15));
        assert_eq!(w.end, date(2019, 6, 15));
        assert_eq!(w.timeframe(), "2018-06-15 2019-06-15");
    }
}
