//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::parse_date;
use crate::stats::WindowPreset;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// payutc-stats - leaderboards from a PayUTC transaction history
///
/// Reads an exported history (a JSON file, or a directory of them) and
/// prints what you bought most, what you spent most on, and who you
/// exchanged the most money with.
///
/// Examples:
///   payutc-stats --history history.json
///   payutc-stats --history exports/ --since week --top 3
///   payutc-stats --history history.json --format markdown --output stats.md
///   payutc-stats --check-transfer 12,50 --recipient "Alice" --credit 20
///   payutc-stats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// History JSON file, or a directory searched for *.json files
    #[arg(
        short = 'H',
        long,
        value_name = "PATH",
        env = "PAYUTC_STATS_HISTORY",
        required_unless_present_any = ["init_config", "check_transfer"]
    )]
    pub history: Option<PathBuf>,

    /// Only count transactions since this point
    ///
    /// Defaults to the config file value, or `ever`.
    #[arg(short, long, value_name = "PRESET")]
    pub since: Option<WindowPreset>,

    /// Keep this many entries in every leaderboard
    ///
    /// Without it, purchases and spending keep 10 entries and transfers keep 5.
    #[arg(short, long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Output format (text, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Reference time for the window, in RFC 3339 (defaults to now)
    #[arg(long, value_name = "TIME")]
    pub now: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .payutc-stats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Check whether a transfer of this amount could be sent, then exit
    ///
    /// Exit code 2 when the transfer would be rejected.
    #[arg(long, value_name = "AMOUNT", requires = "recipient")]
    pub check_transfer: Option<String>,

    /// Recipient of the transfer being checked
    #[arg(long, value_name = "NAME")]
    pub recipient: Option<String>,

    /// Available credit for the transfer being checked
    #[arg(long, value_name = "AMOUNT", requires = "check_transfer")]
    pub credit: Option<String>,

    /// Message attached to the transfer being checked
    #[arg(long, value_name = "TEXT", requires = "check_transfer")]
    pub message: Option<String>,

    /// Generate a default .payutc-stats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text for the terminal (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Transfer checks do not read a history
        if self.check_transfer.is_some() {
            return Ok(());
        }

        if self.top == Some(0) {
            return Err("Top must be at least 1".to_string());
        }

        if let Some(ref raw) = self.now {
            if parse_date(raw).is_none() {
                return Err(format!("Invalid --now time: {}", raw));
            }
        }

        if let Some(ref history) = self.history {
            if !history.exists() {
                return Err(format!("History path does not exist: {}", history.display()));
            }
        }

        Ok(())
    }

    /// Reference clock for window computation.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.now
            .as_deref()
            .and_then(parse_date)
            .unwrap_or_else(Utc::now)
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
