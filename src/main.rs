//! payutc-stats - leaderboards from a PayUTC transaction history
//!
//! A CLI tool that reads an exported transaction history and ranks
//! what was bought, what money was spent on, and who money was
//! exchanged with over a chosen time window.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable history, bad config, etc.)
//!   2 - A checked transfer would be rejected

mod cli;
mod config;
mod error;
mod history;
mod models;
mod money;
mod report;
mod stats;
mod transfer;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{ReportMetadata, StatsReport};
use stats::{WindowPreset, BEGINNING_OF_TIME};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use transfer::TransferDraft;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging needed to write a config file
    if args.init_config {
        return handle_init_config();
    }

    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    debug!("payutc-stats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .payutc-stats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch to the requested mode. Returns the exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    if let Some(ref amount) = args.check_transfer {
        return handle_check_transfer(args, amount, config);
    }

    run_stats(args, config)?;
    Ok(0)
}

/// Handle --check-transfer: validate a transfer and report the verdict.
fn handle_check_transfer(args: &Args, amount: &str, config: &Config) -> Result<i32> {
    let credit = args
        .credit
        .as_deref()
        .map(money::parse_amount)
        .transpose()
        .context("Invalid --credit")?;

    let draft = TransferDraft {
        recipient: args.recipient.clone(),
        amount: Some(amount.to_string()),
        message: args.message.clone(),
    };

    match draft.validate(config.transfer.min_amount_cents, credit) {
        Ok(valid) => {
            println!(
                "OK: {} to {}",
                money::format_euro(valid.amount_in_cents),
                valid.recipient
            );
            if let Some(message) = valid.message {
                println!("Message: {}", message);
            }
            Ok(0)
        }
        Err(e) => {
            warn!("Transfer rejected: {}", e);
            println!("Rejected: {}", e);
            Ok(2)
        }
    }
}

/// Load the history, window it, rank it and emit the report.
fn run_stats(args: &Args, config: &Config) -> Result<()> {
    let path = args
        .history
        .as_deref()
        .context("--history is required to build statistics")?;

    let options = history::LoadOptions {
        show_progress: !args.quiet,
    };
    let loaded = history::load(path, &options)
        .with_context(|| format!("Failed to load history from {}", path.display()))?;
    debug!("History files: {:?}", loaded.files);

    let report = build_report(
        &path.display().to_string(),
        &loaded.records,
        config,
        args.reference_time(),
    );

    let output = match config.general.format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match args.output {
        Some(ref out) => {
            report::write_report(&output, out)
                .with_context(|| format!("Failed to write report to {}", out.display()))?;
            info!("Report saved to {}", out.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Assemble the report for a history snapshot.
fn build_report(
    source: &str,
    records: &[models::TransactionRecord],
    config: &Config,
    now: chrono::DateTime<chrono::Utc>,
) -> StatsReport {
    let preset = config.window.default;
    let cutoff = preset.cutoff(now);
    let windowed = stats::filter_since(records, cutoff);

    info!(
        "{} of {} records since {}",
        windowed.len(),
        records.len(),
        preset
    );

    let since = match preset {
        WindowPreset::Ever => {
            Some(stats::first_transaction_date(records)).filter(|d| *d != BEGINNING_OF_TIME)
        }
        _ => cutoff,
    };

    StatsReport {
        metadata: ReportMetadata {
            source: source.to_string(),
            window: preset.to_string(),
            since,
            generated_at: now,
            total_records: records.len(),
            records_in_window: windowed.len(),
        },
        rankings: stats::build_rankings(&windowed, &config.ranking),
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems are reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("Warning: ignoring {}: {:#}", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
