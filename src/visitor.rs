//! Per-file pipeline: resolve, plan, transfer, report
//!
//! Every failure is terminal for the file at hand only. It is logged with
//! its category tag and returned as a [`VisitOutcome`]; nothing propagates.

use crate::config::Config;
use crate::error::Error;
use crate::plan::{TransferPlan, plan};
use crate::time::TimestampSource;
use crate::time::sidecar::{is_sidecar, sidecar_path};
use crate::transfer::{TransferMode, Transferer, is_same_path};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What happened to one visited entry
#[derive(Debug)]
pub enum VisitOutcome {
    /// File transferred; holds the destination
    Transferred(PathBuf),
    /// Dry run; holds the destination that would have been used
    Planned(PathBuf),
    /// Directories are never organized
    SkippedDirectory,
    /// Sidecars only travel with their primary file
    SkippedSidecar,
    /// Already at its destination
    Duplicate(PathBuf),
    Failed(Error),
}

/// Routes discovered entries through timestamp resolution, planning and
/// transfer. Destinations of successful transfers are written to `out`,
/// one per line.
pub struct FileVisitor<'a, W: Write> {
    config: &'a Config,
    source: TimestampSource,
    transferer: Transferer,
    out: W,
}

impl<'a, W: Write> FileVisitor<'a, W> {
    pub fn new(config: &'a Config, source: TimestampSource, out: W) -> Self {
        let mode = if config.delete_source {
            TransferMode::Move
        } else {
            TransferMode::Copy
        };
        Self {
            config,
            source,
            transferer: Transferer::new(mode, config.preserve_mtime),
            out,
        }
    }

    pub fn visit(&mut self, path: &Path, is_dir: bool) -> VisitOutcome {
        if is_dir {
            return VisitOutcome::SkippedDirectory;
        }
        if is_sidecar(path) {
            debug!(?path, "Skipping sidecar file");
            return VisitOutcome::SkippedSidecar;
        }

        let timestamp = match self.source.resolve(path) {
            Ok(t) => t,
            Err(e) => return failed(path, e.into()),
        };

        let plan = plan(path, &timestamp, self.config);

        if self.config.dry_run {
            if is_same_path(&plan.source, &plan.destination) {
                info!("[dupe] {}", plan.destination.display());
                return VisitOutcome::Duplicate(plan.destination);
            }
            info!(
                source = %plan.source.display(),
                %timestamp,
                "[plan] would transfer to {}",
                plan.destination.display()
            );
            return VisitOutcome::Planned(plan.destination);
        }

        if let Some(parent) = plan.destination.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return failed(
                path,
                Error::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                },
            );
        }

        if is_same_path(&plan.source, &plan.destination) {
            info!("[dupe] {}", plan.destination.display());
            return VisitOutcome::Duplicate(plan.destination);
        }

        if let Err(e) = self.transferer.transfer(&plan.source, &plan.destination) {
            return failed(path, e.into());
        }

        self.transfer_sidecar(&plan);

        debug!(
            source = %plan.source.display(),
            destination = %plan.destination.display(),
            %timestamp,
            "Processed file"
        );
        if let Err(e) = writeln!(self.out, "{}", plan.destination.display()) {
            error!("[stdout] cannot report {}: {e}", plan.destination.display());
        }

        VisitOutcome::Transferred(plan.destination)
    }

    /// Carry `<source>.json` along to `<destination>.json`.
    ///
    /// Failures are logged only; the primary transfer stands.
    fn transfer_sidecar(&self, plan: &TransferPlan) {
        let companion = sidecar_path(&plan.source);
        if !companion.is_file() {
            return;
        }

        let dest = sidecar_path(&plan.destination);
        match self.transferer.transfer(&companion, &dest) {
            Ok(()) => debug!(sidecar = %companion.display(), "Transferred sidecar"),
            Err(source) => {
                let e = Error::Sidecar {
                    path: companion,
                    source,
                };
                warn!("[{}] {e}", e.category());
            }
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

fn failed(path: &Path, e: Error) -> VisitOutcome {
    match e {
        Error::Timestamp(_) | Error::Stat { .. } => warn!(?path, "[{}] {e}", e.category()),
        _ => error!(?path, "[{}] {e}", e.category()),
    }
    VisitOutcome::Failed(e)
}
