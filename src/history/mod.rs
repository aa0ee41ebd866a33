//! History snapshot loading.
//!
//! This module reads exported transaction histories from disk. A path may
//! point at a single JSON file or at a directory, in which case every
//! `*.json` file below it is read in path order and the records are
//! concatenated.

use crate::error::{Result, StatsError};
use crate::models::TransactionRecord;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Envelope key used by the PayUTC history endpoint.
const ENVELOPE_KEY: &str = "historique";

/// Options for loading a history.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Whether to show a progress bar for multi-file loads.
    pub show_progress: bool,
}

/// A history read from disk.
#[derive(Debug, Clone)]
pub struct LoadedHistory {
    /// Files the records came from.
    pub files: Vec<PathBuf>,
    /// All records, in file order then document order.
    pub records: Vec<TransactionRecord>,
}

/// Decode one history document.
///
/// Accepts a bare array of records or an object wrapping one under
/// `historique`. Anything else is not a history.
pub fn parse_history(content: &str) -> Result<Vec<TransactionRecord>> {
    let value: Value = serde_json::from_str(content)?;

    let records = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove(ENVELOPE_KEY) {
            Some(inner @ Value::Array(_)) => inner,
            Some(other) => return Err(StatsError::NotASequence(json_kind(&other))),
            None => return Err(StatsError::NotASequence("an object without a history")),
        },
        other => return Err(StatsError::NotASequence(json_kind(&other))),
    };

    Ok(serde_json::from_value(records)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and decode a single history file.
pub fn load_file(path: &Path) -> Result<Vec<TransactionRecord>> {
    let content = fs::read_to_string(path).map_err(|source| StatsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_history(&content)?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// List the history files below a directory, sorted by path.
///
/// Hidden files and directories are skipped.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|e| StatsError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e.into(),
        })?;

        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Load a history from a file or a directory of files.
pub fn load(path: &Path, options: &LoadOptions) -> Result<LoadedHistory> {
    if path.is_file() {
        let records = load_file(path)?;
        return Ok(LoadedHistory {
            files: vec![path.to_path_buf()],
            records,
        });
    }

    if !path.is_dir() {
        return Err(StatsError::InvalidArgument(format!(
            "history path is neither a file nor a directory: {}",
            path.display()
        )));
    }

    let files = discover_files(path)?;
    if files.is_empty() {
        warn!("No history files found in {}", path.display());
    }

    let progress = if options.show_progress && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut records = Vec::new();
    for file in &files {
        if let Some(ref pb) = progress {
            pb.set_message(file.display().to_string());
        }

        records.extend(load_file(file)?);

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        "Loaded {} records from {} files in {}",
        records.len(),
        files.len(),
        path.display()
    );

    Ok(LoadedHistory { files, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    const SAMPLE: &str = r#"[
        {"date": "2020-01-05T10:00:00Z", "type": "buy", "items": [{"name": "Coffee", "quantity": 2, "unit_price_in_cents": 100}], "amount_in_cents": 200},
        {"date": "2020-01-06T10:00:00Z", "type": "transfer_out", "counterpart_name": "Bob", "amount_in_cents": 1000}
    ]"#;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_history(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, TransactionKind::TransferOut);
    }

    #[test]
    fn test_parse_envelope() {
        let wrapped = format!(r#"{{"historique": {}, "credit": 1500}}"#, SAMPLE);
        assert_eq!(parse_history(&wrapped).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_sequences() {
        for content in [r#"{"credit": 12}"#, r#""history""#, "42", r#"{"historique": {}}"#] {
            assert!(
                matches!(parse_history(content), Err(StatsError::NotASequence(_))),
                "{content} should be rejected"
            );
        }
        assert!(matches!(parse_history("[1, 2"), Err(StatsError::Json(_))));
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, SAMPLE).unwrap();

        let loaded = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.files, vec![path]);
        assert_eq!(loaded.records.len(), 2);
    }

    #[test]
    fn test_load_directory_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2020")).unwrap();
        fs::write(
            dir.path().join("2020").join("b.json"),
            r#"[{"type": "recharge", "amount_in_cents": 2}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("2020").join("a.json"),
            r#"[{"type": "recharge", "amount_in_cents": 1}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not json").unwrap();
        fs::write(dir.path().join(".hidden.json"), "garbage").unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache").join("c.json"), "garbage").unwrap();

        let loaded = load(dir.path(), &LoadOptions::default()).unwrap();
        assert_eq!(loaded.files.len(), 2);
        let amounts: Vec<_> = loaded.records.iter().map(|r| r.amount_in_cents).collect();
        assert_eq!(amounts, vec![1, 2]);
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load(&missing, &LoadOptions::default()),
            Err(StatsError::InvalidArgument(_))
        ));
    }
}
