//! JSON sidecar files
//!
//! A sidecar is named after its primary file with `.json` appended
//! (`IMG_0001.jpg` -> `IMG_0001.jpg.json`) and carries EXIF-like fields.

use crate::error::TimestampError;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension that marks a sidecar file
pub const SIDECAR_EXTENSION: &str = "json";

#[derive(Debug, Deserialize)]
struct SidecarExif {
    #[serde(rename = "DateTime")]
    date_time: Option<String>,
}

/// Sidecar path belonging to `path`
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// Whether `path` is itself a sidecar and must not be organized on its own
pub fn is_sidecar(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SIDECAR_EXTENSION)
}

/// Read the raw `DateTime` value from a sidecar file
pub fn read_sidecar_time(sidecar: &Path) -> Result<String, TimestampError> {
    let unreadable = |message: String| TimestampError::SourceUnreadable {
        path: sidecar.to_path_buf(),
        message,
    };

    let bytes = fs::read(sidecar).map_err(|e| unreadable(format!("can't read file: {e}")))?;
    let data: SidecarExif =
        serde_json::from_slice(&bytes).map_err(|e| unreadable(format!("can't unmarshal: {e}")))?;

    data.date_time.ok_or_else(|| TimestampError::NoTimestampFound {
        path: sidecar.to_path_buf(),
    })
}
