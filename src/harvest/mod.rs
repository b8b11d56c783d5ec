//! The harvesting pipeline.
//!
//! A run opens the search page and walks the result list top to bottom:
//!
//! ```text
//! Scanning(i) -> Extracting(i) -> ResolvingDate -> Filtering -> Recording -> Scanning(i+1)
//!                                                           \-> Stopped
//! ```
//!
//! # Ordering precondition
//!
//! The site lists results newest first, so the scan stops at the first entry
//! outside the recency window and never looks further. If that ordering does
//! not hold, later in-window articles are missed. A date newer than the one
//! before it is logged and counted in [`HarvestOutcome::out_of_order`], but
//! the list is never reordered.
//!
//! # Failures
//!
//! A wait timeout, unparseable date, or browser error aborts the run. The
//! records collected so far are dropped with the error.

pub mod detail;
pub mod walker;

use crate::analysis::{count_occurrences, mentions_money};
use crate::browser::BrowserSession;
use crate::error::Result;
use crate::models::{ArticleRecord, ListEntry, SearchQuery};
use crate::site::SiteLayout;
use crate::window::RecencyWindow;
use chrono::NaiveDate;
use detail::DetailDateResolver;
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;
use walker::ResultListWalker;

/// Why the scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The entry at `index` was dated outside the window.
    OutOfWindow { index: usize, date: NaiveDate },
    /// Every row on the list page was recorded.
    Exhausted { entries: usize },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub window: RecencyWindow,
    /// Recorded articles in list order.
    pub records: Vec<ArticleRecord>,
    pub stop: StopReason,
    /// Entries whose date was newer than the entry above them.
    pub out_of_order: usize,
}

enum State {
    Scanning(usize),
    Extracting(usize),
    ResolvingDate(ListEntry),
    Filtering(ListEntry, NaiveDate),
    Recording(ListEntry, NaiveDate),
    Stopped(StopReason),
}

#[derive(Debug, Clone)]
pub struct HarvestPipeline {
    query: SearchQuery,
    layout: SiteLayout,
    base_url: Url,
    wait_timeout: Duration,
}

impl HarvestPipeline {
    pub fn new(query: SearchQuery, layout: SiteLayout, base_url: Url, wait_timeout: Duration) -> Self {
        Self {
            query,
            layout,
            base_url,
            wait_timeout,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Run the scan against `browser`, with the window ending on `today`.
    #[instrument(level = "info", skip_all, fields(phrase = %self.query.search_phrase, months = self.query.months_back))]
    pub async fn run<B: BrowserSession>(&self, browser: &mut B, today: NaiveDate) -> Result<HarvestOutcome> {
        let window = RecencyWindow::from_months_back(self.query.months_back, today);
        info!(%window, category = %self.query.category, "Recency window");

        let search_url = self.layout.search_url(&self.base_url, &self.query.search_phrase)?;
        info!(url = %search_url, "Opening search page");
        browser.open(search_url.as_str()).await?;

        let mut walker = ResultListWalker::new(&self.layout, &self.base_url, self.wait_timeout);
        let resolver = DetailDateResolver::new(&self.layout, self.wait_timeout);

        let mut records = Vec::new();
        let mut previous: Option<NaiveDate> = None;
        let mut out_of_order = 0;
        let mut state = State::Scanning(1);

        let stop = loop {
            state = match state {
                State::Scanning(index) => {
                    let total = walker.sync(browser).await?;
                    if index > total {
                        State::Stopped(StopReason::Exhausted { entries: total })
                    } else {
                        State::Extracting(index)
                    }
                }
                State::Extracting(index) => State::ResolvingDate(walker.entry(browser, index).await?),
                State::ResolvingDate(entry) => {
                    let date = resolver.resolve(browser, &entry.detail_link).await?;
                    State::Filtering(entry, date)
                }
                State::Filtering(entry, date) => {
                    if let Some(prev) = previous {
                        if date > prev {
                            out_of_order += 1;
                            warn!(index = entry.index, %date, previous = %prev, "Result list is not newest-first");
                        }
                    }
                    previous = Some(date);

                    if window.contains(date) {
                        State::Recording(entry, date)
                    } else {
                        info!(index = entry.index, title = %entry.title, %date, "Article is out of the time range; stopping");
                        State::Stopped(StopReason::OutOfWindow {
                            index: entry.index,
                            date,
                        })
                    }
                }
                State::Recording(entry, date) => {
                    let next = entry.index + 1;
                    records.push(self.record(entry, date));
                    State::Scanning(next)
                }
                State::Stopped(reason) => break reason,
            };
        };

        info!(count = records.len(), ?stop, out_of_order, "Harvest finished");
        Ok(HarvestOutcome {
            window,
            records,
            stop,
            out_of_order,
        })
    }

    fn record(&self, entry: ListEntry, date: NaiveDate) -> ArticleRecord {
        let phrase = &self.query.search_phrase;
        ArticleRecord {
            search_phrase_count: count_occurrences(&entry.title, &entry.description, phrase),
            contains_money: mentions_money(&entry.title, &entry.description),
            title: entry.title,
            date,
            description: entry.description,
            image_url: entry.image_url,
        }
    }
}
