//! Publication dates, which only appear on article pages.

use crate::browser::BrowserSession;
use crate::error::{HarvestError, Result};
use crate::site::SiteLayout;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct DetailDateResolver<'a> {
    layout: &'a SiteLayout,
    timeout: Duration,
}

impl<'a> DetailDateResolver<'a> {
    pub fn new(layout: &'a SiteLayout, timeout: Duration) -> Self {
        Self { layout, timeout }
    }

    /// Visit `link`, read its publication date and go back to the list.
    ///
    /// The browser is back on the list page when this returns `Ok`, but the
    /// list has not been waited for yet.
    #[instrument(level = "info", skip(self, browser))]
    pub async fn resolve<B: BrowserSession>(&self, browser: &mut B, link: &str) -> Result<NaiveDate> {
        browser.goto(link).await?;
        browser
            .wait_visible(&self.layout.published_date, self.timeout)
            .await?;
        let text = browser.text(&self.layout.published_date).await?;
        browser.go_back().await?;

        let date = parse_published_date(&text, &self.layout.date_prefix, &self.layout.date_format)?;
        debug!(%text, %date, "Resolved publication date");
        Ok(date)
    }
}

/// Parse text like `"Published Dec 6, 2023"`.
pub fn parse_published_date(text: &str, prefix: &str, format: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    let bare = trimmed.strip_prefix(prefix).unwrap_or(trimmed).trim();
    NaiveDate::parse_from_str(bare, format).map_err(|source| HarvestError::DateParse {
        text: text.to_string(),
        source,
    })
}
