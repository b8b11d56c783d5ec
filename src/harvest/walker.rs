//! Reads result rows off the search list by position.

use crate::browser::BrowserSession;
use crate::error::{HarvestError, Result};
use crate::models::ListEntry;
use crate::site::SiteLayout;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Walks the result list one position at a time.
///
/// Nothing read from the page is kept between calls except the row count
/// taken on the first [`sync`](Self::sync).
#[derive(Debug)]
pub struct ResultListWalker<'a> {
    layout: &'a SiteLayout,
    base_url: &'a Url,
    timeout: Duration,
    total: Option<usize>,
}

impl<'a> ResultListWalker<'a> {
    pub fn new(layout: &'a SiteLayout, base_url: &'a Url, timeout: Duration) -> Self {
        Self {
            layout,
            base_url,
            timeout,
            total: None,
        }
    }

    /// Wait for the result container, then return the number of rows.
    ///
    /// Must be called every time the list page is (re)shown and before any
    /// [`entry`](Self::entry) read.
    #[instrument(level = "debug", skip_all)]
    pub async fn sync<B: BrowserSession>(&mut self, browser: &mut B) -> Result<usize> {
        browser
            .wait_visible(&self.layout.result_container, self.timeout)
            .await?;
        if let Some(total) = self.total {
            return Ok(total);
        }
        let total = browser.count(&self.layout.result_rows).await?;
        info!(count = total, "Result rows on list page");
        self.total = Some(total);
        Ok(total)
    }

    /// Read the entry at 1-based `index` from the list page as it is now.
    #[instrument(level = "debug", skip(self, browser))]
    pub async fn entry<B: BrowserSession>(&self, browser: &mut B, index: usize) -> Result<ListEntry> {
        let locators = self.layout.entry(index);

        let title = browser.text(&locators.title).await?;
        let description = browser.text(&locators.description).await?;
        let image_url = browser
            .attribute(&locators.image, "src")
            .await?
            .filter(|src| !src.is_empty());
        if image_url.is_none() {
            debug!(index, "Result has no image");
        }

        let href = browser
            .attribute(&locators.link, "href")
            .await?
            .ok_or_else(|| HarvestError::ElementNotFound(format!("{} @href", locators.link)))?;
        let detail_link = self.base_url.join(&href)?.to_string();

        debug!(index, %title, %detail_link, "Read list entry");
        Ok(ListEntry {
            index,
            title,
            description,
            image_url,
            detail_link,
        })
    }
}
