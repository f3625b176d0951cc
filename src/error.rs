//! Error types for tsrename
//!
//! Every error carries a short category tag. Diagnostics are written as
//! `[<category>] <message>` so that the stderr stream can be filtered.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tsrename operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tsrename
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal, raised only while validating the configuration
    #[error("{0}")]
    Config(String),

    #[error("cannot stat {path}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("couldn't transfer sidecar {path}: {source}")]
    Sidecar {
        path: PathBuf,
        source: TransferError,
    },
}

impl Error {
    /// Diagnostic category shown in brackets at the start of a log line
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config(_) => "path",
            Error::Stat { .. } => "stat",
            Error::WalkDir(_) => "walk",
            Error::Stdin(_) => "stdin",
            Error::Timestamp(e) => e.category(),
            Error::CreateDir { .. } => "mkdir",
            Error::Transfer(_) => "move",
            Error::Sidecar { .. } => "sidecar",
        }
    }

    /// Whether this error must abort the run before any file is processed
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Failure to derive a timestamp for a single file
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("no timestamp found for {path}")]
    NoTimestampFound { path: PathBuf },

    #[error("malformed timestamp {value:?} for {path}: {message}")]
    Malformed {
        path: PathBuf,
        value: String,
        message: String,
    },

    #[error("cannot read timestamp source {path}: {message}")]
    SourceUnreadable { path: PathBuf, message: String },
}

impl TimestampError {
    pub fn category(&self) -> &'static str {
        match self {
            TimestampError::NoTimestampFound { .. } | TimestampError::Malformed { .. } => "parse",
            TimestampError::SourceUnreadable { path, .. } => {
                if path.extension().is_some_and(|ext| ext == "json") {
                    "json"
                } else {
                    "exif"
                }
            }
        }
    }
}

/// Failure to copy or move one file
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
