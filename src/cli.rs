//! Command-line interface definitions for the harvester.
//!
//! The query can come from an input work item file, from flags, or both;
//! flags win. Every query flag also reads an environment variable.

use crate::workitems::{Months, WorkItemVariables};
use clap::Parser;

/// Command-line arguments for a harvest run.
///
/// # Examples
///
/// ```sh
/// # Query from flags
/// gothamist_harvest -s "congestion pricing" -m 2 -o ./output
///
/// # Query from a work item, months overridden
/// gothamist_harvest -w ./workitem.json -m 3
///
/// # With a config file and a visible browser window
/// gothamist_harvest -c ./harvest.yaml -s fed --headful
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input work item JSON file
    #[arg(short, long, env = "WORK_ITEM_PATH")]
    pub work_item: Option<String>,

    /// Phrase to search for
    #[arg(short, long, env = "SEARCH_PHRASE")]
    pub search_phrase: Option<String>,

    /// News category (recorded with the run)
    #[arg(long, env = "CATEGORY")]
    pub category: Option<String>,

    /// How many months back to keep articles (0 and 1 mean the current month)
    #[arg(short, long, env = "MONTHS", allow_negative_numbers = true)]
    pub months: Option<i64>,

    /// Output directory for the table, JSON report and output work item
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seconds to wait for a page element before failing the run
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,
}

impl Cli {
    /// Query fields given on the command line.
    pub fn query_overrides(&self) -> WorkItemVariables {
        WorkItemVariables {
            search_phrase: self.search_phrase.clone(),
            category: self.category.clone(),
            months: self.months.map(Months::Number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "gothamist_harvest",
            "--search-phrase",
            "congestion pricing",
            "--category",
            "news",
            "--months",
            "2",
            "--output-dir",
            "./output",
        ]);

        assert_eq!(cli.search_phrase.as_deref(), Some("congestion pricing"));
        assert_eq!(cli.category.as_deref(), Some("news"));
        assert_eq!(cli.months, Some(2));
        assert_eq!(cli.output_dir.as_deref(), Some("./output"));
        assert!(!cli.headful);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "gothamist_harvest",
            "-w",
            "/tmp/workitem.json",
            "-m",
            "-1",
            "-c",
            "/tmp/harvest.yaml",
        ]);

        assert_eq!(cli.work_item.as_deref(), Some("/tmp/workitem.json"));
        assert_eq!(cli.months, Some(-1));
        assert_eq!(cli.config.as_deref(), Some("/tmp/harvest.yaml"));
    }

    #[test]
    fn test_query_overrides() {
        let cli = Cli::parse_from(["gothamist_harvest", "-s", "fed", "-m", "3"]);
        let vars = cli.query_overrides();
        assert_eq!(vars.search_phrase.as_deref(), Some("fed"));
        assert_eq!(vars.category, None);
        assert_eq!(vars.months, Some(Months::Number(3)));
    }
}
