//! Error types for log ingestion.
//!
//! Only whole-input failures surface here. Problems inside a single line are
//! absorbed by the classifier and never become errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a log file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Log file not found.
    #[error("log file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read from a stream.
    #[error("failed to read log stream: {0}")]
    StreamRead(#[from] std::io::Error),

    /// File exceeds the configured size limit.
    #[error("log file {path} is {size} bytes, limit is {max_size} bytes")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
