use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// All errors produced by the vote-count audit.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A region file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A snapshot is missing a required field or holds an out-of-domain value.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Fewer than two snapshots, so no adjacent pair can be compared.
    #[error("Insufficient data: need at least 2 snapshots, got {count}")]
    InsufficientData { count: usize },

    /// Two snapshots share an identical timestamp (strict mode only).
    #[error("Ambiguous ordering: duplicate timestamp {0}")]
    OrderingAmbiguity(DateTime<Utc>),

    /// An input path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No JSON region files were found under the given directory.
    #[error("No JSON files found in {0}")]
    NoDataFiles(PathBuf),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the audit crates.
pub type Result<T> = std::result::Result<T, AuditError>;
