//! The recency window an article's publication date must fall in.
//!
//! Months are approximated as 30 days once the window reaches back past the
//! current month. Three months back from any day in March 2024 starts on
//! 2024-01-01 (March 1st minus 60 days), not on December 1st.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Inclusive `[start, end]` date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecencyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RecencyWindow {
    /// Build the window for `months_back` ending on `today`.
    ///
    /// `0` and `1` both mean "since the first of this month". A start before
    /// the earliest representable date is clamped to it.
    pub fn from_months_back(months_back: u32, today: NaiveDate) -> Self {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let start = if months_back <= 1 {
            first_of_month
        } else {
            let days = Days::new(30 * u64::from(months_back - 1));
            first_of_month.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
        };
        Self { start, end: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
