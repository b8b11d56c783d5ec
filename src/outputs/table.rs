//! The tabular output: one header row, then one row per article.

use crate::error::Result;
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const HEADERS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image URL",
    "Search Phrase Count",
    "Contains Money",
];

/// Render `records` as CSV, dates as `YYYY-MM-DD` and a missing image as an
/// empty cell.
pub fn to_csv(records: &[ArticleRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;
    for record in records {
        let date = record.date.format("%Y-%m-%d").to_string();
        let count = record.search_phrase_count.to_string();
        let money = record.contains_money.to_string();
        writer.write_record([
            record.title.as_str(),
            date.as_str(),
            record.description.as_str(),
            record.image_url.as_deref().unwrap_or(""),
            count.as_str(),
            money.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Write the table to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_table(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let bytes = to_csv(records)?;
    fs::write(path, bytes).await?;
    info!(rows = records.len(), "Wrote article table");
    Ok(())
}
