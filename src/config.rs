//! Configuration types for tsrename

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// How the organizing timestamp of a file is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampStrategy {
    /// Search the file path for a `YYYY_MM_DD_HH_MM_SS` pattern
    #[default]
    Filename,
    /// Read the `DateTime` tag from a JSON sidecar or from embedded EXIF
    Metadata,
}

/// Configuration for a single run
///
/// Built once at startup, validated by [`Config::prepare`] and then only
/// read by the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root to walk recursively; when absent, paths are read from stdin
    pub source_root: Option<PathBuf>,

    /// Destination root of the date tree
    pub output_dir: Option<PathBuf>,

    /// Rename destination files to `{prefix}_{timestamp}{ext}`
    pub name_prefix: Option<String>,

    /// Move instead of copy
    pub delete_source: bool,

    /// Timestamp extraction strategy
    pub strategy: TimestampStrategy,

    /// Copy the source modification time onto copied files
    pub preserve_mtime: bool,

    /// Resolve and plan, but do not touch the filesystem
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: None,
            output_dir: None,
            name_prefix: None,
            delete_source: false,
            strategy: TimestampStrategy::default(),
            preserve_mtime: true,
            dry_run: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Destination root. Always non-empty; falls back to `.` before
    /// [`Config::prepare`] has resolved it.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }

    /// Configured name prefix, ignoring an empty string
    pub fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref().filter(|p| !p.is_empty())
    }

    /// Validate the configuration and create the output directory.
    ///
    /// The output directory defaults to the source root when walking and to
    /// the current working directory when reading paths from stdin.
    pub fn prepare(&mut self) -> Result<()> {
        if let Some(root) = &self.source_root
            && fs::metadata(root).is_err()
        {
            return Err(Error::Config(format!(
                "<source> {} does not exist",
                root.display()
            )));
        }

        if self.output_dir.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
            let dir = match &self.source_root {
                Some(root) => root.clone(),
                None => std::env::current_dir().map_err(|e| {
                    Error::Config(format!("cannot determine working directory: {e}"))
                })?,
            };
            info!("[path] no <destination>, using {}", dir.display());
            self.output_dir = Some(dir);
        }

        if !self.dry_run {
            let dir = self.output_dir();
            fs::create_dir_all(dir).map_err(|e| {
                Error::Config(format!("cannot create <destination> {}: {e}", dir.display()))
            })?;
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading the configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_defaults_output_to_source() {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            source_root: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        config.prepare().unwrap();
        assert_eq!(config.output_dir(), dir.path());
    }

    #[test]
    fn test_prepare_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a").join("b");
        let mut config = Config {
            output_dir: Some(out.clone()),
            ..Config::default()
        };
        config.prepare().unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_prepare_rejects_missing_source() {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            source_root: Some(dir.path().join("missing")),
            output_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let err = config.prepare().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.category(), "path");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        let config = Config {
            name_prefix: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(config.name_prefix(), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsrename.toml");
        fs::write(
            &path,
            "output_dir = \"/srv/photos\"\nname_prefix = \"trip\"\nstrategy = \"metadata\"\ndelete_source = true\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.output_dir(), Path::new("/srv/photos"));
        assert_eq!(config.name_prefix(), Some("trip"));
        assert_eq!(config.strategy, TimestampStrategy::Metadata);
        assert!(config.delete_source);
        assert!(config.preserve_mtime);
    }

    #[test]
    fn test_load_from_file_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "strategy = \"sundial\"\n").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
