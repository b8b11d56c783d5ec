//! Error type shared by the harvesting pipeline and its collaborators.
//!
//! Everything here except [`HarvestError::InvalidQuery`] aborts a run that is
//! already underway. An absent image attribute is not an error at all; it is
//! recorded as `None` on the article.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    /// A required element did not become visible within the wait bound.
    #[error("Timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: String, timeout: Duration },

    /// The detail page date text did not have the expected shape.
    #[error("Could not parse publication date {text:?}: {source}")]
    DateParse {
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The query was rejected before any browsing started.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A required element was not present on the current page.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<chromiumoxide::error::CdpError> for HarvestError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        HarvestError::Browser(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
