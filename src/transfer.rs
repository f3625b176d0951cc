//! Copy and move primitives

use crate::error::TransferError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BUFFER_SIZE: usize = 256 * 1024;

/// What happens to the source after a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Duplicate the file, leaving the source in place
    #[default]
    Copy,
    /// Rename, or copy then delete when renaming is not possible
    Move,
}

/// Performs file transfers with a fixed policy
#[derive(Debug, Clone, Copy)]
pub struct Transferer {
    mode: TransferMode,
    preserve_mtime: bool,
}

impl Transferer {
    pub fn new(mode: TransferMode, preserve_mtime: bool) -> Self {
        Self {
            mode,
            preserve_mtime,
        }
    }

    /// Transfer `source` to `dest`, creating missing parent directories.
    ///
    /// `dest` is truncated if it exists. A failed copy may leave a partial
    /// destination behind; the source is only removed after a complete copy.
    pub fn transfer(&self, source: &Path, dest: &Path) -> Result<(), TransferError> {
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| TransferError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let same = is_same_path(source, dest);

        match self.mode {
            TransferMode::Copy => {
                if same {
                    debug!(?source, "Source and destination are the same file, not copying");
                    return Ok(());
                }
                self.copy(source, dest)
            }
            TransferMode::Move => {
                // Rename is atomic on one filesystem; across devices it fails
                if fs::rename(source, dest).is_ok() {
                    return Ok(());
                }
                if same {
                    return Ok(());
                }
                debug!(?source, ?dest, "Rename failed, falling back to copy and delete");
                self.copy_then_remove(source, dest)
            }
        }
    }

    /// Move across filesystems. The destination is complete once the copy
    /// returns, so a source that cannot be removed is only logged.
    fn copy_then_remove(&self, source: &Path, dest: &Path) -> Result<(), TransferError> {
        self.copy(source, dest)?;
        if let Err(e) = fs::remove_file(source) {
            warn!("[move] cannot remove source {}: {e}", source.display());
        }
        Ok(())
    }

    fn copy(&self, source: &Path, dest: &Path) -> Result<(), TransferError> {
        copy_file(source, dest)?;

        if self.preserve_mtime
            && let Ok(metadata) = fs::metadata(source)
            && let Ok(mtime) = metadata.modified()
            && let Err(e) =
                filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime))
        {
            warn!("[move] cannot preserve mtime on {}: {e}", dest.display());
        }

        Ok(())
    }
}

/// Copy file with buffered I/O; the destination is flushed and closed
/// before returning
fn copy_file(source: &Path, dest: &Path) -> Result<(), TransferError> {
    let open_err = |e| TransferError::Open {
        path: source.to_path_buf(),
        source: e,
    };
    let write_err = |e| TransferError::Write {
        path: dest.to_path_buf(),
        source: e,
    };

    let src_file = File::open(source).map_err(open_err)?;
    let dest_file = File::create(dest).map_err(write_err)?;

    let mut reader = BufReader::with_capacity(BUFFER_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, dest_file);

    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(open_err)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read]).map_err(write_err)?;
    }

    let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
    file.sync_data().map_err(write_err)?;
    Ok(())
}

/// Absolute, symlink-free form of `path` when it can be determined.
///
/// The file itself need not exist, only its parent directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(parent) = fs::canonicalize(parent) {
            return parent.join(name);
        }
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether two paths name the same location
pub fn is_same_path(a: &Path, b: &Path) -> bool {
    absolute_path(a) == absolute_path(b)
}
