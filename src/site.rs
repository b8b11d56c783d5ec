//! Where things live on the source site.
//!
//! Result rows are addressed by position, so every per-entry locator is a
//! template with an `{index}` placeholder that is filled in again on each
//! visit to the list page.

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://gothamist.com";

/// XPath locators for the search list and article pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    /// Path of the search page, relative to the base URL.
    pub search_path: String,
    /// Container that must be visible before any result row is read.
    pub result_container: String,
    /// Matches every result row; its count bounds the scan.
    pub result_rows: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub link: String,
    /// Date element on an article page.
    pub published_date: String,
    /// Text in front of the date, e.g. `"Published Dec 6, 2023"`.
    pub date_prefix: String,
    /// chrono format of the remainder.
    pub date_format: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            search_path: "/search".to_string(),
            result_container: r#"//*[@id="resultList"]"#.to_string(),
            result_rows: r#"//*[@id="resultList"]/div[2]/div"#.to_string(),
            title: r#"//*[@id="resultList"]/div[2]/div[{index}]/div/div[2]/div[1]/a/div"#
                .to_string(),
            description: r#"//*[@id="resultList"]/div[2]/div[{index}]/div/div[2]/div[2]/p"#
                .to_string(),
            image: r#"//*[@id="resultList"]/div[2]/div[{index}]/div/div[1]/figure[2]/div/div/a/div/img"#
                .to_string(),
            link: r#"//*[@id="resultList"]/div[2]/div[{index}]/div/div[2]/div[1]/a"#.to_string(),
            published_date: r#"//*[@id="__nuxt"]/div/div/main/div[2]/section[1]/div/div[2]/div[2]/div[2]/div/div[1]/div[2]/div[2]/p"#
                .to_string(),
            date_prefix: "Published ".to_string(),
            date_format: "%b %d, %Y".to_string(),
        }
    }
}

/// Locators for a single result row, derived from [`SiteLayout`] by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocators {
    pub title: String,
    pub description: String,
    pub image: String,
    pub link: String,
}

impl SiteLayout {
    pub fn entry(&self, index: usize) -> EntryLocators {
        let fill = |template: &str| template.replace("{index}", &index.to_string());
        EntryLocators {
            title: fill(&self.title),
            description: fill(&self.description),
            image: fill(&self.image),
            link: fill(&self.link),
        }
    }

    /// Search page URL for `phrase`, e.g. `https://gothamist.com/search?q=fed%20rates`.
    pub fn search_url(&self, base: &Url, phrase: &str) -> Result<Url, url::ParseError> {
        let mut url = base.join(&self.search_path)?;
        url.set_query(Some(&format!("q={}", urlencoding::encode(phrase))));
        Ok(url)
    }
}
