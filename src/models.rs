//! Data models for the harvest run.
//!
//! - [`SearchQuery`]: what to search for and how far back to look
//! - [`ListEntry`]: one row of the result list, valid only while the list is shown
//! - [`ArticleRecord`]: the scored article that ends up in the output table

use crate::error::{HarvestError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound on `months_back`: a hundred years of 30-day months.
pub const MAX_MONTHS_BACK: u32 = 1200;

/// Validated input for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub search_phrase: String,
    pub category: String,
    pub months_back: u32,
}

impl SearchQuery {
    /// Build a query from raw values, rejecting a blank phrase or a month
    /// count outside `0..=MAX_MONTHS_BACK`.
    ///
    /// The phrase is kept exactly as given; it is what gets searched for and
    /// counted.
    pub fn new(search_phrase: &str, category: &str, months_back: i64) -> Result<Self> {
        if search_phrase.trim().is_empty() {
            return Err(HarvestError::InvalidQuery(
                "search phrase must not be empty".to_string(),
            ));
        }
        let months_back = u32::try_from(months_back)
            .ok()
            .filter(|m| *m <= MAX_MONTHS_BACK)
            .ok_or_else(|| {
                HarvestError::InvalidQuery(format!(
                    "months must be between 0 and {MAX_MONTHS_BACK}, got {months_back}"
                ))
            })?;
        Ok(Self {
            search_phrase: search_phrase.to_string(),
            category: category.to_string(),
            months_back,
        })
    }
}

/// A search result as shown on the list page.
///
/// `index` is the 1-based position in the list. It is not a stable identity:
/// after any navigation the entry must be read again by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub detail_link: String,
}

/// An article that passed the recency filter, with its text analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    /// Publication date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub description: String,
    pub image_url: Option<String>,
    pub search_phrase_count: usize,
    pub contains_money: bool,
}
