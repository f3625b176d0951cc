//! Main processing loop
//!
//! Pulls candidates from a [`Discovery`] one at a time and hands each to the
//! [`FileVisitor`]. Strictly sequential: a file and its sidecar are fully
//! transferred before the next candidate is read.

use crate::config::Config;
use crate::discovery::Discovery;
use crate::time::TimestampSource;
use crate::visitor::{FileVisitor, VisitOutcome};
use std::io::Write;
use tracing::{Level, span, warn};

/// Processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_entries: usize,
    pub transferred: usize,
    pub planned: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, outcome: &VisitOutcome) {
        match outcome {
            VisitOutcome::Transferred(_) => self.transferred += 1,
            VisitOutcome::Planned(_) => self.planned += 1,
            VisitOutcome::SkippedDirectory | VisitOutcome::SkippedSidecar => self.skipped += 1,
            VisitOutcome::Duplicate(_) => self.duplicates += 1,
            VisitOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Transferred: {}, Planned: {}, Skipped: {}, Duplicates: {}, Failed: {}",
            self.total_entries,
            self.transferred,
            self.planned,
            self.skipped,
            self.duplicates,
            self.failed
        )
    }
}

/// Main processor for organizing media files
pub struct Processor<'a, W: Write> {
    visitor: FileVisitor<'a, W>,
    stats: ProcessingStats,
}

impl<'a, W: Write> Processor<'a, W> {
    /// Create a processor writing destinations to `out`
    pub fn new(config: &'a Config, out: W) -> Self {
        let source = TimestampSource::from(config.strategy);
        Self {
            visitor: FileVisitor::new(config, source, out),
            stats: ProcessingStats::new(),
        }
    }

    /// Process every candidate. Per-entry errors are logged and counted,
    /// never returned.
    pub fn run(&mut self, discovery: Discovery<'_>) -> &ProcessingStats {
        let _span = span!(Level::INFO, "processor_run").entered();

        for candidate in discovery {
            self.stats.total_entries += 1;
            match candidate {
                Ok(candidate) => {
                    let outcome = self.visitor.visit(&candidate.path, candidate.is_dir);
                    self.stats.record(&outcome);
                }
                Err(e) => {
                    warn!("[{}] {e}", e.category());
                    self.stats.failed += 1;
                }
            }
        }

        &self.stats
    }

    pub fn into_output(self) -> W {
        self.visitor.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn run_walk(config: &Config, root: &Path) -> (ProcessingStats, Vec<PathBuf>) {
        let mut processor = Processor::new(config, Vec::new());
        let stats = processor.run(Discovery::walk(root)).clone();
        let out = String::from_utf8(processor.into_output()).unwrap();
        (stats, out.lines().map(PathBuf::from).collect())
    }

    #[test]
    fn test_processing_stats() {
        let mut stats = ProcessingStats::new();
        stats.record(&VisitOutcome::Transferred(PathBuf::from("a")));
        stats.record(&VisitOutcome::SkippedDirectory);
        stats.record(&VisitOutcome::SkippedSidecar);
        stats.record(&VisitOutcome::Duplicate(PathBuf::from("b")));

        let summary = stats.summary();
        assert!(summary.contains("Transferred: 1"));
        assert!(summary.contains("Skipped: 2"));
        assert!(summary.contains("Duplicates: 1"));
        assert!(summary.contains("Failed: 0"));
    }

    #[test]
    fn test_walk_continues_after_failures() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir_all(input.join("nested")).unwrap();
        fs::write(input.join("a_no_timestamp.jpg"), b"a").unwrap();
        fs::write(input.join("b_2020_01_02_03_04_05.jpg"), b"b").unwrap();
        fs::write(input.join("nested").join("c_2020_01_02_04_00_00.png"), b"c").unwrap();

        let config = Config {
            source_root: Some(input.clone()),
            output_dir: Some(output.clone()),
            ..Config::default()
        };
        let (stats, printed) = run_walk(&config, &input);

        assert_eq!(stats.total_entries, 5);
        assert_eq!(stats.transferred, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 2);
        assert_eq!(
            printed,
            vec![
                output.join("2020/2020_01/2020_01_02/2020_01_02_03/b_2020_01_02_03_04_05.jpg"),
                output.join("2020/2020_01/2020_01_02/2020_01_02_04/c_2020_01_02_04_00_00.png"),
            ]
        );
    }

    #[test]
    fn test_second_pass_over_output_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("IMG_2021_06_15_10_30_00.jpg"), b"x").unwrap();

        let first = Config {
            output_dir: Some(output.clone()),
            ..Config::default()
        };
        let (stats, _) = run_walk(&first, &input);
        assert_eq!(stats.transferred, 1);

        let (stats, printed) = run_walk(&first, &output);
        assert_eq!(stats.transferred, 0);
        assert_eq!(stats.duplicates, 1);
        assert!(printed.is_empty());
    }

    #[test]
    fn test_chained_stream_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        let second = dir.path().join("second");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("IMG_2021_06_15_10_30_00.jpg"), b"x").unwrap();

        let first = Config {
            output_dir: Some(output.clone()),
            ..Config::default()
        };
        let (_, printed) = run_walk(&first, &input);

        // Feed the first pass's stdout into a second pass, with log noise mixed in
        let mut stream = String::from("[dupe] something\n");
        for path in &printed {
            stream.push_str(&format!("{}\n", path.display()));
        }

        let chained = Config {
            output_dir: Some(second.clone()),
            name_prefix: Some("archive".into()),
            ..Config::default()
        };
        let mut processor = Processor::new(&chained, Vec::new());
        let stats = processor.run(Discovery::stream(Cursor::new(stream))).clone();

        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.transferred, 1);
        assert!(
            second
                .join("2021/2021_06/2021_06_15/2021_06_15_10/archive_2021_06_15_10_30_00.jpg")
                .is_file()
        );
    }
}
