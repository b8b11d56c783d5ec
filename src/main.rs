//! # Gothamist Harvest
//!
//! Searches Gothamist for a phrase with a headless Chromium, keeps the
//! results published within a recency window, scores each article for
//! phrase and money mentions, and writes them out as a table.
//!
//! ## Usage
//!
//! ```sh
//! gothamist_harvest -s "congestion pricing" -m 2 -o ./output
//! ```
//!
//! ## Architecture
//!
//! 1. **Input**: build the query from the input work item and CLI flags
//! 2. **Harvest**: walk the result list, visiting each article for its date,
//!    until the first article older than the window
//! 3. **Output**: write `news_data.csv`, `news_data.json` and the output work item
//!
//! The browser is closed whether or not the harvest succeeds. Nothing but the
//! failed output work item is written when it does not.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod browser;
mod cli;
mod config;
mod error;
mod harvest;
mod models;
mod outputs;
mod site;
mod utils;
mod window;
mod workitems;

use browser::chrome::ChromeSession;
use cli::Cli;
use config::{HarvestConfig, load_config};
use harvest::HarvestPipeline;
use outputs::json::{HarvestReport, write_report};
use outputs::table::write_table;
use utils::{ensure_writable_dir, truncate_for_log};
use workitems::{WorkItemOutput, WorkItemVariables};

const TABLE_FILE: &str = "news_data.csv";
const REPORT_FILE: &str = "news_data.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("gothamist_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => load_config(Path::new(path)).await?,
        None => HarvestConfig::default(),
    };
    config.apply_cli(&args);

    // Fail on an unwritable output dir before launching a browser.
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let output = match run(&args, &config).await {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "Harvest failed");
            if let Err(write_err) =
                workitems::complete(&config.output_dir, &WorkItemOutput::failed(&e)).await
            {
                warn!(error = %write_err, "Could not write failed output work item");
            }
            return Err(e.into());
        }
    };
    workitems::complete(&config.output_dir, &output).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        records = output.records,
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run(args: &Cli, config: &HarvestConfig) -> error::Result<WorkItemOutput> {
    let variables = match &args.work_item {
        Some(path) => workitems::load_input(Path::new(path)).await?,
        None => WorkItemVariables::default(),
    };
    let query = variables.merge(args.query_overrides()).into_query()?;
    info!(
        phrase = %query.search_phrase,
        category = %query.category,
        months = query.months_back,
        "Query ready"
    );

    let pipeline = HarvestPipeline::new(
        query,
        config.layout.clone(),
        config.base_url()?,
        config.wait_timeout(),
    );

    let mut session = ChromeSession::launch(config.headless).await?;
    let harvest = pipeline.run(&mut session, Local::now().date_naive()).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close browser cleanly");
    }
    let outcome = harvest?;

    for (i, record) in outcome.records.iter().enumerate() {
        debug!(
            index = i + 1,
            title = %record.title,
            date = %record.date,
            description = %truncate_for_log(&record.description, 120),
            count = record.search_phrase_count,
            money = record.contains_money,
            "Recorded article"
        );
    }

    let table_path: PathBuf = config.output_dir.join(TABLE_FILE);
    write_table(&outcome.records, &table_path).await?;

    let report_path = config.output_dir.join(REPORT_FILE);
    let report = HarvestReport {
        query: pipeline.query(),
        window: &outcome.window,
        articles: &outcome.records,
    };
    write_report(&report, &report_path).await?;

    if outcome.out_of_order > 0 {
        warn!(
            count = outcome.out_of_order,
            "Some results were not newest-first; later in-window articles may have been missed"
        );
    }

    Ok(WorkItemOutput::completed(
        outcome.records.len(),
        vec![table_path, report_path],
    ))
}
