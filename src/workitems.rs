//! Input and output work items exchanged with the job runner.
//!
//! The input is a JSON file of the form
//!
//! ```json
//! { "variables": { "search_phrase": "congestion pricing", "category": "news", "months": 2 } }
//! ```
//!
//! `months` may also arrive as a string (`"2"`), as some runners only pass
//! strings through. At the end of a run the outcome is written to
//! `work_item_output.json` in the output directory.

use crate::error::{HarvestError, Result};
use crate::models::SearchQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const OUTPUT_FILE: &str = "work_item_output.json";

#[derive(Debug, Deserialize)]
struct WorkItemFile {
    #[serde(default)]
    variables: WorkItemVariables,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Months {
    Number(i64),
    Text(String),
}

impl Months {
    fn value(&self) -> Result<i64> {
        match self {
            Months::Number(n) => Ok(*n),
            Months::Text(s) => s.trim().parse().map_err(|_| {
                HarvestError::InvalidQuery(format!("months is not an integer: {s:?}"))
            }),
        }
    }
}

/// Raw query variables; any of them may be missing until CLI overrides are
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkItemVariables {
    pub search_phrase: Option<String>,
    pub category: Option<String>,
    pub months: Option<Months>,
}

impl WorkItemVariables {
    /// Replace fields with the ones set in `overrides`.
    pub fn merge(self, overrides: WorkItemVariables) -> Self {
        Self {
            search_phrase: overrides.search_phrase.or(self.search_phrase),
            category: overrides.category.or(self.category),
            months: overrides.months.or(self.months),
        }
    }

    /// Validate into a [`SearchQuery`]. A missing category is empty; missing
    /// months means the current month only.
    pub fn into_query(self) -> Result<SearchQuery> {
        let phrase = self.search_phrase.ok_or_else(|| {
            HarvestError::InvalidQuery("search_phrase is required".to_string())
        })?;
        let months = match self.months {
            Some(m) => m.value()?,
            None => 1,
        };
        SearchQuery::new(&phrase, self.category.as_deref().unwrap_or(""), months)
    }
}

/// Read the variables of the input work item at `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_input(path: &Path) -> Result<WorkItemVariables> {
    let raw = fs::read_to_string(path).await?;
    let item: WorkItemFile = serde_json::from_str(&raw)?;
    info!(variables = ?item.variables, "Loaded input work item");
    Ok(item.variables)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemState {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkItemOutput {
    pub state: WorkItemState,
    pub records: usize,
    pub artifacts: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl WorkItemOutput {
    pub fn completed(records: usize, artifacts: Vec<PathBuf>) -> Self {
        Self {
            state: WorkItemState::Completed,
            records,
            artifacts,
            error: None,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(error: &dyn std::error::Error) -> Self {
        Self {
            state: WorkItemState::Failed,
            records: 0,
            artifacts: Vec::new(),
            error: Some(error.to_string()),
            finished_at: Utc::now(),
        }
    }
}

/// Signal the end of the run by writing `output` into `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), state = ?output.state))]
pub async fn complete(output_dir: &Path, output: &WorkItemOutput) -> Result<PathBuf> {
    let path = output_dir.join(OUTPUT_FILE);
    fs::write(&path, serde_json::to_string_pretty(output)?).await?;
    info!(path = %path.display(), "Wrote output work item");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workitem.json");
        std::fs::write(
            &path,
            r#"{"variables": {"search_phrase": "fed", "category": "news", "months": 3}}"#,
        )
        .unwrap();

        let vars = load_input(&path).await.unwrap();
        let query = vars.into_query().unwrap();
        assert_eq!(query.search_phrase, "fed");
        assert_eq!(query.category, "news");
        assert_eq!(query.months_back, 3);
    }

    #[test]
    fn test_months_as_string() {
        let item: WorkItemFile =
            serde_json::from_str(r#"{"variables": {"search_phrase": "fed", "months": " 2 "}}"#)
                .unwrap();
        assert_eq!(item.variables.into_query().unwrap().months_back, 2);
    }

    #[test]
    fn test_negative_months_rejected() {
        let vars = WorkItemVariables {
            search_phrase: Some("fed".to_string()),
            category: None,
            months: Some(Months::Number(-2)),
        };
        assert!(matches!(vars.into_query(), Err(HarvestError::InvalidQuery(_))));
    }

    #[test]
    fn test_out_of_range_months_rejected() {
        let item: WorkItemFile = serde_json::from_str(
            r#"{"variables": {"search_phrase": "fed", "months": 5000000}}"#,
        )
        .unwrap();
        assert!(matches!(
            item.variables.into_query(),
            Err(HarvestError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_missing_phrase_rejected() {
        let vars = WorkItemVariables::default();
        assert!(matches!(vars.into_query(), Err(HarvestError::InvalidQuery(_))));
    }

    #[test]
    fn test_defaults_when_optional_fields_missing() {
        let vars = WorkItemVariables {
            search_phrase: Some("fed".to_string()),
            ..Default::default()
        };
        let query = vars.into_query().unwrap();
        assert_eq!(query.category, "");
        assert_eq!(query.months_back, 1);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = WorkItemVariables {
            search_phrase: Some("fed".to_string()),
            category: Some("news".to_string()),
            months: Some(Months::Number(1)),
        };
        let cli = WorkItemVariables {
            months: Some(Months::Number(4)),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.search_phrase.as_deref(), Some("fed"));
        assert_eq!(merged.category.as_deref(), Some("news"));
        assert_eq!(merged.months, Some(Months::Number(4)));
    }

    #[tokio::test]
    async fn test_complete_writes_state() {
        let dir = tempfile::tempdir().unwrap();
        let output = WorkItemOutput::completed(2, vec![dir.path().join("news_data.csv")]);

        let path = complete(dir.path(), &output).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["state"], "COMPLETED");
        assert_eq!(value["records"], 2);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failed_output_carries_error() {
        let err = HarvestError::InvalidQuery("search_phrase is required".to_string());
        let output = WorkItemOutput::failed(&err);
        assert_eq!(output.state, WorkItemState::Failed);
        assert_eq!(
            output.error.as_deref(),
            Some("Invalid query: search_phrase is required")
        );
    }
}
