//! In-memory [`BrowserSession`] for tests.
//!
//! Pages are keyed by URL and hold elements keyed by locator. A page is not
//! readable after a navigation until something on it has been waited for,
//! which catches reads that skip the re-synchronization wait.

use super::BrowserSession;
use crate::error::{HarvestError, Result};
use crate::site::SiteLayout;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub attrs: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub elements: HashMap<String, FakeElement>,
    pub counts: HashMap<String, usize>,
}

/// One search result as the fake site serves it.
#[derive(Debug, Clone)]
pub struct FakeResult {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub link: String,
    /// Text of the date element on the article page; `None` leaves the
    /// element out so waiting for it times out.
    pub date_text: Option<String>,
}

impl FakeResult {
    pub fn new(title: &str, description: &str, link: &str, date_text: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            image: Some(format!("{link}.jpg")),
            link: link.to_string(),
            date_text: Some(date_text.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    history: Vec<String>,
    ready: bool,
    /// Every URL navigated to, in order.
    pub visits: Vec<String>,
    pub back_calls: usize,
}

impl FakeBrowser {
    /// A site whose search page at `search_url` lists `results` using the
    /// locators in `layout`.
    pub fn with_results(layout: &SiteLayout, search_url: &str, results: &[FakeResult]) -> Self {
        let mut list = FakePage::default();
        list.elements
            .insert(layout.result_container.clone(), FakeElement::default());
        list.counts.insert(layout.result_rows.clone(), results.len());

        let mut browser = FakeBrowser::default();
        for (i, result) in results.iter().enumerate() {
            let locators = layout.entry(i + 1);
            list.elements.insert(
                locators.title,
                FakeElement {
                    text: result.title.clone(),
                    ..Default::default()
                },
            );
            list.elements.insert(
                locators.description,
                FakeElement {
                    text: result.description.clone(),
                    ..Default::default()
                },
            );
            if let Some(src) = &result.image {
                let mut attrs = HashMap::new();
                attrs.insert("src".to_string(), src.clone());
                list.elements.insert(
                    locators.image,
                    FakeElement {
                        attrs,
                        ..Default::default()
                    },
                );
            }
            let mut attrs = HashMap::new();
            attrs.insert("href".to_string(), result.link.clone());
            list.elements.insert(
                locators.link,
                FakeElement {
                    attrs,
                    ..Default::default()
                },
            );

            let mut detail = FakePage::default();
            if let Some(date_text) = &result.date_text {
                detail.elements.insert(
                    layout.published_date.clone(),
                    FakeElement {
                        text: date_text.clone(),
                        ..Default::default()
                    },
                );
            }
            browser.pages.insert(result.link.clone(), detail);
        }
        browser.pages.insert(search_url.to_string(), list);
        browser
    }

    fn current(&self) -> Result<&FakePage> {
        let url = self
            .history
            .last()
            .ok_or_else(|| HarvestError::Browser("no page open".to_string()))?;
        if !self.ready {
            return Err(HarvestError::Browser(format!(
                "read from {url} before waiting for it to render"
            )));
        }
        self.pages
            .get(url)
            .ok_or_else(|| HarvestError::Browser(format!("unknown page {url}")))
    }

    fn navigate(&mut self, url: &str) {
        self.visits.push(url.to_string());
        self.history.push(url.to_string());
        self.ready = false;
    }

    /// Number of article pages visited so far.
    pub fn detail_visits(&self, search_url: &str) -> usize {
        self.visits.iter().filter(|u| *u != search_url).count()
    }
}

impl BrowserSession for FakeBrowser {
    async fn open(&mut self, url: &str) -> Result<()> {
        self.history.clear();
        self.navigate(url);
        Ok(())
    }

    async fn wait_visible(&mut self, locator: &str, timeout: Duration) -> Result<()> {
        let visible = self
            .history
            .last()
            .and_then(|url| self.pages.get(url))
            .is_some_and(|page| page.elements.contains_key(locator));
        if visible {
            self.ready = true;
            Ok(())
        } else {
            Err(HarvestError::Timeout {
                locator: locator.to_string(),
                timeout,
            })
        }
    }

    async fn count(&mut self, locator: &str) -> Result<usize> {
        Ok(self.current()?.counts.get(locator).copied().unwrap_or(0))
    }

    async fn text(&mut self, locator: &str) -> Result<String> {
        self.current()?
            .elements
            .get(locator)
            .map(|e| e.text.clone())
            .ok_or_else(|| HarvestError::ElementNotFound(locator.to_string()))
    }

    async fn attribute(&mut self, locator: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .current()?
            .elements
            .get(locator)
            .and_then(|e| e.attrs.get(name).cloned()))
    }

    async fn goto(&mut self, url: &str) -> Result<()> {
        self.navigate(url);
        Ok(())
    }

    async fn go_back(&mut self) -> Result<()> {
        self.back_calls += 1;
        if self.history.len() < 2 {
            return Err(HarvestError::Browser("no page to go back to".to_string()));
        }
        self.history.pop();
        self.ready = false;
        Ok(())
    }
}
