//! Browser automation surface used by the harvester.
//!
//! The pipeline only ever talks to a [`BrowserSession`]. The live
//! implementation drives Chromium over the DevTools protocol
//! ([`chrome::ChromeSession`]); tests use an in-memory fake.
//!
//! # No element handles
//!
//! Result rows are re-rendered whenever the browser navigates back to the
//! list, so any handle taken before a detail visit is stale afterwards. The
//! trait therefore addresses elements by locator on every call and exposes
//! [`count`](BrowserSession::count) rather than a list of elements.

use crate::error::Result;
use std::time::Duration;

pub mod chrome;
#[cfg(test)]
pub mod fake;

/// Operations the pipeline needs from a browser. All locators are XPath.
pub trait BrowserSession {
    /// Open `url` as the current page.
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Wait until the element at `locator` is visible.
    ///
    /// Fails with [`HarvestError::Timeout`](crate::error::HarvestError::Timeout)
    /// once `timeout` has elapsed.
    async fn wait_visible(&mut self, locator: &str, timeout: Duration) -> Result<()>;

    /// Number of elements matching `locator` right now.
    async fn count(&mut self, locator: &str) -> Result<usize>;

    /// Rendered text of the element at `locator`.
    async fn text(&mut self, locator: &str) -> Result<String>;

    /// Value of attribute `name`, or `None` if the element or the attribute
    /// is absent.
    async fn attribute(&mut self, locator: &str, name: &str) -> Result<Option<String>>;

    /// Navigate the current page to `url`.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Return to the previous page in history.
    async fn go_back(&mut self) -> Result<()>;
}
