//! Filename timestamp parsing

use crate::error::TimestampError;
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::trace;

/// Layout of the embedded filename timestamp
pub const FILENAME_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Pattern: YYYY_MM_DD_HH_MM_SS, ASCII digits only
static PATTERN_UNDERSCORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{4}_[0-9]{2}_[0-9]{2}_[0-9]{2}_[0-9]{2}_[0-9]{2}").unwrap()
});

/// First substring of `s` shaped like a filename timestamp
pub fn find_timestamp(s: &str) -> Option<&str> {
    PATTERN_UNDERSCORED.find(s).map(|m| m.as_str())
}

/// Parse the timestamp embedded in a file path.
///
/// The whole path is searched, so a timestamped directory name also counts.
pub fn parse_path_time(path: &Path) -> Result<NaiveDateTime, TimestampError> {
    let text = path.to_string_lossy();
    let Some(found) = find_timestamp(&text) else {
        return Err(TimestampError::NoTimestampFound {
            path: path.to_path_buf(),
        });
    };
    trace!(?path, timestamp = found, "Matched filename pattern");

    NaiveDateTime::parse_from_str(found, FILENAME_FORMAT).map_err(|e| TimestampError::Malformed {
        path: path.to_path_buf(),
        value: found.to_string(),
        message: e.to_string(),
    })
}
