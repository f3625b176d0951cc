//! Timestamp extraction module
//!
//! A file's organizing timestamp comes from exactly one strategy per run:
//! - Embedded metadata: a JSON sidecar (`<file>.json`) when present,
//!   otherwise the EXIF `DateTime` tag of the file itself
//! - Filename pattern: the first `YYYY_MM_DD_HH_MM_SS` found in the path

pub mod exif;
pub mod filename;
pub mod sidecar;

use crate::config::TimestampStrategy;
use crate::error::TimestampError;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::debug;

/// Layout of the metadata date-time value, shared by EXIF and sidecars
pub const METADATA_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// A resolved organizing timestamp, second precision, no time zone
pub type ResolvedTimestamp = NaiveDateTime;

/// Capability that turns a file path into its organizing timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Sidecar `DateTime` field, or the embedded EXIF `DateTime` tag
    Metadata,
    /// `YYYY_MM_DD_HH_MM_SS` embedded anywhere in the path
    FilenamePattern,
}

impl From<TimestampStrategy> for TimestampSource {
    fn from(strategy: TimestampStrategy) -> Self {
        match strategy {
            TimestampStrategy::Metadata => TimestampSource::Metadata,
            TimestampStrategy::Filename => TimestampSource::FilenamePattern,
        }
    }
}

impl TimestampSource {
    /// Resolve the timestamp of `path`
    pub fn resolve(&self, path: &Path) -> Result<ResolvedTimestamp, TimestampError> {
        match self {
            TimestampSource::FilenamePattern => filename::parse_path_time(path),
            TimestampSource::Metadata => resolve_metadata(path),
        }
    }
}

/// A sidecar, when present, wins over the embedded tag. A broken sidecar
/// fails the file rather than falling back to EXIF.
fn resolve_metadata(path: &Path) -> Result<ResolvedTimestamp, TimestampError> {
    let companion = sidecar::sidecar_path(path);
    let (raw, origin) = if companion.is_file() {
        debug!(?path, sidecar = ?companion, "Reading timestamp from sidecar");
        (sidecar::read_sidecar_time(&companion)?, companion.as_path())
    } else {
        (exif::read_exif_time(path)?, path)
    };

    parse_metadata_time(origin, &raw)
}

/// Parse a `YYYY:MM:DD HH:MM:SS` value read from `origin`
pub fn parse_metadata_time(origin: &Path, raw: &str) -> Result<ResolvedTimestamp, TimestampError> {
    let value = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(value, METADATA_FORMAT).map_err(|e| TimestampError::Malformed {
        path: origin.to_path_buf(),
        value: value.to_string(),
        message: e.to_string(),
    })
}
