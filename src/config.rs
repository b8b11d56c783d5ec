//! Run configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! YAML file, and command-line flags.
//!
//! ```yaml
//! base_url: https://gothamist.com
//! wait_timeout_secs: 10
//! headless: true
//! output_dir: output
//! layout:
//!   date_prefix: "Published "
//! ```

use crate::cli::Cli;
use crate::error::Result;
use crate::site::{DEFAULT_BASE_URL, SiteLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub base_url: String,
    /// Bound on every "element visible" wait.
    pub wait_timeout_secs: u64,
    pub headless: bool,
    pub output_dir: PathBuf,
    pub layout: SiteLayout,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            headless: true,
            output_dir: PathBuf::from("output"),
            layout: SiteLayout::default(),
        }
    }
}

impl HarvestConfig {
    /// Apply flags that were given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.output_dir {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = cli.timeout_secs {
            self.wait_timeout_secs = secs;
        }
        if cli.headful {
            self.headless = false;
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }
}

/// Load a YAML config file; fields it leaves out keep their defaults.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_config(path: &Path) -> Result<HarvestConfig> {
    let raw = fs::read_to_string(path).await?;
    let config: HarvestConfig = serde_yaml::from_str(&raw)?;
    info!(base_url = %config.base_url, timeout = config.wait_timeout_secs, "Loaded configuration");
    Ok(config)
}
