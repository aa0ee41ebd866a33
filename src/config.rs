//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.payutc-stats.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::stats::WindowPreset;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".payutc-stats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Time window settings.
    #[serde(default)]
    pub window: WindowConfig,

    /// Leaderboard sizes.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Transfer checks.
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Time window settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Preset used when `--since` is not given.
    #[serde(default)]
    pub default: WindowPreset,
}

/// How many entries each leaderboard keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_item_top")]
    pub purchased_top: usize,

    #[serde(default = "default_item_top")]
    pub spent_top: usize,

    #[serde(default = "default_person_top")]
    pub received_top: usize,

    #[serde(default = "default_person_top")]
    pub given_top: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            purchased_top: default_item_top(),
            spent_top: default_item_top(),
            received_top: default_person_top(),
            given_top: default_person_top(),
        }
    }
}

fn default_item_top() -> usize {
    10
}

fn default_person_top() -> usize {
    5
}

/// Transfer validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Smallest amount that may be sent, in cents.
    #[serde(default = "default_min_amount")]
    pub min_amount_cents: i64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            min_amount_cents: default_min_amount(),
        }
    }
}

fn default_min_amount() -> i64 {
    1
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.payutc-stats.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(since) = args.since {
            self.window.default = since;
        }

        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(top) = args.top {
            self.ranking = RankingConfig {
                purchased_top: top,
                spent_top: top,
                received_top: top,
                given_top: top,
            };
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
