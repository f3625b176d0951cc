//! Candidate discovery
//!
//! Candidates come either from a recursive walk of the source root or from
//! a stream with one path per line. Both are consumed the same way.

use crate::error::{Error, Result};
use std::fs;
use std::io::{BufRead, ErrorKind, Lines};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// A discovered filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub is_dir: bool,
}

enum Inner<'a> {
    Walk(walkdir::IntoIter),
    Stream {
        lines: Lines<Box<dyn BufRead + 'a>>,
        done: bool,
    },
}

/// Lazy, single-pass sequence of candidates
pub struct Discovery<'a> {
    inner: Inner<'a>,
}

impl<'a> Discovery<'a> {
    /// Depth-first walk of `root` in file-name order, root included.
    /// Symlinks are not followed.
    pub fn walk(root: &Path) -> Self {
        let iter = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            inner: Inner::Walk(iter),
        }
    }

    /// One candidate path per line of `reader`.
    ///
    /// Lines starting with `[` are diagnostics from another process (for
    /// example a chained tsrename) and are logged instead of processed.
    pub fn stream<R: BufRead + 'a>(reader: R) -> Self {
        let reader: Box<dyn BufRead + 'a> = Box::new(reader);
        Self {
            inner: Inner::Stream {
                lines: reader.lines(),
                done: false,
            },
        }
    }
}

impl Iterator for Discovery<'_> {
    type Item = Result<Candidate>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Walk(iter) => iter.next().map(|entry| -> Result<Candidate> {
                let entry = entry?;
                Ok(Candidate {
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                })
            }),
            Inner::Stream { lines, done } => loop {
                if *done {
                    return None;
                }
                let line = match lines.next()? {
                    Ok(line) => line,
                    Err(e) => {
                        // Undecodable lines are skippable, anything else ends the stream
                        if e.kind() != ErrorKind::InvalidData {
                            *done = true;
                        }
                        return Some(Err(Error::Stdin(e)));
                    }
                };

                if line.starts_with('[') {
                    info!("[stdin] {line}");
                    continue;
                }

                let path = PathBuf::from(line);
                return Some(match fs::metadata(&path) {
                    Ok(metadata) => Ok(Candidate {
                        is_dir: metadata.is_dir(),
                        path,
                    }),
                    Err(source) => Err(Error::Stat { path, source }),
                });
            },
        }
    }
}
