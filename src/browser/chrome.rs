//! Chromium-backed [`BrowserSession`].
//!
//! Elements are located by evaluating XPath in the page on every call, so no
//! DOM node ids are held between calls. Visibility is decided by the page's
//! own `checkVisibility()`.

use super::BrowserSession;
use crate::error::{HarvestError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A single Chromium instance with one tab.
///
/// Call [`close`](ChromeSession::close) when done; dropping the session
/// without closing only stops the event handler and leaves the process to
/// chromiumoxide's own cleanup.
pub struct ChromeSession {
    browser: Browser,
    page: chromiumoxide::Page,
    handler: JoinHandle<()>,
}

impl std::fmt::Debug for ChromeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeSession").finish()
    }
}

impl ChromeSession {
    /// Launch Chromium and open a blank tab.
    #[instrument(level = "info")]
    pub async fn launch(headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(HarvestError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler error (continuing)");
                }
            }
            debug!("CDP handler finished");
        });

        let page = browser.new_page("about:blank").await?;
        info!(headless, "Browser launched");
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Close the browser and wait for the process to exit.
    #[instrument(level = "info", skip_all)]
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Browser process did not exit cleanly");
        }
        info!("Browser closed");
        Ok(())
    }

    /// Evaluate `expression` in the page and decode its value.
    ///
    /// The value is sent back through `JSON.stringify` because DevTools
    /// reports a bare `null` as no value at all.
    async fn eval<T: serde::de::DeserializeOwned>(&self, expression: &str) -> Result<T> {
        let script = format!("JSON.stringify({expression})");
        let json: String = self.page.evaluate(script).await?.into_value()?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn is_visible(&self, locator: &str) -> bool {
        let expression = with_first_node(
            locator,
            "!!n && (typeof n.checkVisibility !== 'function' || n.checkVisibility())",
        );
        match self.eval::<bool>(&expression).await {
            Ok(visible) => visible,
            Err(e) => {
                // The execution context goes away while a navigation is in flight.
                debug!(%locator, error = %e, "Visibility check failed");
                false
            }
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// JS expression applying `body` (in terms of `n`) to the first node
/// matching `xpath`; `n` is `null` when nothing matches.
fn with_first_node(xpath: &str, body: &str) -> String {
    format!(
        "[document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue].map(n => {body})[0]",
        js_string(xpath)
    )
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

impl BrowserSession for ChromeSession {
    #[instrument(level = "info", skip(self))]
    async fn open(&mut self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_visible(&mut self, locator: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_visible(locator).await {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarvestError::Timeout {
                    locator: locator.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn count(&mut self, locator: &str) -> Result<usize> {
        let expression = format!(
            "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
            js_string(locator)
        );
        self.eval::<usize>(&expression).await
    }

    async fn text(&mut self, locator: &str) -> Result<String> {
        let expression = with_first_node(locator, "n ? n.innerText : null");
        self.eval::<Option<String>>(&expression)
            .await?
            .map(|t| t.trim().to_string())
            .ok_or_else(|| HarvestError::ElementNotFound(locator.to_string()))
    }

    async fn attribute(&mut self, locator: &str, name: &str) -> Result<Option<String>> {
        let body = format!("n ? n.getAttribute({}) : null", js_string(name));
        self.eval::<Option<String>>(&with_first_node(locator, &body))
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn go_back(&mut self) -> Result<()> {
        self.page.evaluate("window.history.back()").await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }
}
