//! JSON output for API consumers.
//!
//! The file holds the query, the recency window that was applied, and the
//! records in list order:
//!
//! ```json
//! {
//!   "query": { "search_phrase": "fed", "category": "", "months_back": 1 },
//!   "window": { "start": "2024-03-01", "end": "2024-03-15" },
//!   "articles": [ ... ]
//! }
//! ```

use crate::error::Result;
use crate::models::{ArticleRecord, SearchQuery};
use crate::window::RecencyWindow;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct HarvestReport<'a> {
    pub query: &'a SearchQuery,
    pub window: &'a RecencyWindow,
    pub articles: &'a [ArticleRecord],
}

/// Serialize `report` to `path` as pretty-printed JSON.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &HarvestReport<'_>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).await?;
    info!(articles = report.articles.len(), "Wrote JSON report");
    Ok(())
}
