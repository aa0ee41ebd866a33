//! Error types for history loading and amount handling.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("History is not a sequence of records: found {0}")]
    NotASequence(&'static str),

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;
