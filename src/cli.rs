//! CLI argument parsing with clap

use crate::config::{Config, TimestampStrategy};
use clap::Parser;
use std::path::PathBuf;

/// tsrename - organize photos and videos into a date tree
///
/// Copies (or moves) each file to
/// OUTPUT/YYYY/YYYY_MM/YYYY_MM_DD/YYYY_MM_DD_HH/, taking the timestamp from
/// a YYYY_MM_DD_HH_MM_SS pattern in the path or, with --exif, from the
/// file's metadata. Without a source directory, paths are read from stdin,
/// one per line; lines starting with '[' are ignored. Every destination is
/// printed on stdout so runs can be chained.
#[derive(Parser, Debug)]
#[command(name = "tsrename")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Source directory to walk recursively
    #[arg(value_name = "SOURCE", conflicts_with = "source")]
    pub source_dir: Option<PathBuf>,

    /// Source directory to walk recursively (default: read paths from stdin)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Destination directory (default: the source directory, or the
    /// current directory when reading from stdin)
    #[arg(short, long, env = "TSRENAME_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Rename targets to NAME_YYYY_MM_DD_HH_MM_SS.ext
    #[arg(short, long)]
    pub name: Option<String>,

    /// Remove the source files (move instead of copy)
    #[arg(short, long)]
    pub del: bool,

    /// Use EXIF data (or a .json sidecar) instead of the filename timestamp
    #[arg(short, long)]
    pub exif: bool,

    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Show what would be done without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Do not copy the source modification time onto copied files
    #[arg(long)]
    pub no_preserve_mtime: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the log file as JSON
    #[arg(long, requires = "log_file")]
    pub json_log: bool,
}

impl Cli {
    fn source_root(&self) -> Option<&PathBuf> {
        self.source.as_ref().or(self.source_dir.as_ref())
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(source) = self.source_root() {
            config.source_root = Some(source.clone());
        }
        if let Some(ref output) = self.output {
            config.output_dir = Some(output.clone());
        }
        if let Some(ref name) = self.name {
            config.name_prefix = Some(name.clone());
        }
        if self.del {
            config.delete_source = true;
        }
        if self.exif {
            config.strategy = TimestampStrategy::Metadata;
        }
        if self.no_preserve_mtime {
            config.preserve_mtime = false;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
