//! Destination path planning
//!
//! Destinations follow `output/YYYY/YYYY_MM/YYYY_MM_DD/YYYY_MM_DD_HH/<name>`.
//! Planning is pure: it never touches the filesystem.

use crate::config::Config;
use crate::time::ResolvedTimestamp;
use crate::time::filename::FILENAME_FORMAT;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory levels below the output root, coarsest first
const DIR_LEVELS: [&str; 4] = ["%Y", "%Y_%m", "%Y_%m_%d", "%Y_%m_%d_%H"];

/// A source file paired with where it should end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Compute the destination of `source` for the resolved `timestamp`
pub fn plan(source: &Path, timestamp: &ResolvedTimestamp, config: &Config) -> TransferPlan {
    let mut destination = config.output_dir().to_path_buf();
    destination.push(date_dirs(timestamp));
    destination.push(target_filename(source, timestamp, config.name_prefix()));

    TransferPlan {
        source: source.to_path_buf(),
        destination,
    }
}

/// Relative date directory chain for `timestamp`
pub fn date_dirs(timestamp: &ResolvedTimestamp) -> PathBuf {
    DIR_LEVELS
        .iter()
        .map(|level| timestamp.format(level).to_string())
        .collect()
}

fn target_filename(source: &Path, timestamp: &ResolvedTimestamp, prefix: Option<&str>) -> OsString {
    let base = source.file_name().unwrap_or(source.as_os_str());
    match prefix {
        Some(prefix) => {
            let base = base.to_string_lossy();
            format!(
                "{}_{}{}",
                prefix,
                timestamp.format(FILENAME_FORMAT),
                extension_with_dot(&base)
            )
            .into()
        }
        None => base.to_os_string(),
    }
}

/// Everything from the last dot of `name`, or nothing.
///
/// Unlike [`Path::extension`] a dotfile such as `.hidden` keeps its whole
/// name as extension and the original case is untouched.
fn extension_with_dot(name: &str) -> &str {
    name.rfind('.').map_or("", |idx| &name[idx..])
}
