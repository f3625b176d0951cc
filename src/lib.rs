//! tsrename - organize media files into a date-structured directory tree
//!
//! Each file's timestamp is taken from one of:
//! - a `YYYY_MM_DD_HH_MM_SS` pattern in its path
//! - a `<file>.json` sidecar carrying a `DateTime` field
//! - the EXIF `DateTime` tag embedded in the file
//!
//! Files are then copied or moved to
//! `output/YYYY/YYYY_MM/YYYY_MM_DD/YYYY_MM_DD_HH/`, optionally renamed with
//! a prefix. Candidates come from a recursive walk or from stdin, one path
//! per line, and every destination is reported on stdout.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod plan;
pub mod process;
pub mod time;
pub mod transfer;
pub mod visitor;

pub use cli::Cli;
pub use config::{Config, ConfigError, TimestampStrategy};
pub use discovery::{Candidate, Discovery};
pub use error::{Error, Result, TimestampError, TransferError};
pub use plan::{TransferPlan, plan};
pub use process::{ProcessingStats, Processor};
pub use time::{ResolvedTimestamp, TimestampSource};
pub use transfer::{TransferMode, Transferer};
pub use visitor::{FileVisitor, VisitOutcome};
