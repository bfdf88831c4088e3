//! Filesystem utilities for atomic operations.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Suffix used for in-flight writes.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Atomically rename a file over `destination`.
///
/// On Unix `rename` replaces the destination atomically. On Windows a rename
/// onto an existing file may be refused; only there is the destination
/// removed and the rename retried. A failed rename never removes the
/// destination elsewhere, and the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(temp_path, destination) {
        Ok(()) => Ok(()),
        #[cfg(windows)]
        Err(initial_err) if destination.exists() && temp_path.exists() => {
            let _ = fs::remove_file(destination);
            fs::rename(temp_path, destination).map_err(|retry_err| {
                let _ = fs::remove_file(temp_path);
                io::Error::new(
                    retry_err.kind(),
                    format!(
                        "Atomic rename failed (initial: {}, retry: {})",
                        initial_err, retry_err
                    ),
                )
            })
        }
        Err(err) => {
            let _ = fs::remove_file(temp_path);
            Err(err)
        }
    }
}

/// Write `data` to a fresh, synced temp file next to `path` and return its path.
///
/// This is the first half of [`write_atomic`]; the destination is untouched.
pub fn write_temp(path: &Path, data: &[u8]) -> io::Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent"))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid filename"))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("System time error: {}", e)))?
        .as_nanos();
    let temp_path = parent.join(format!("{}.{}{}", filename, nanos, TEMP_SUFFIX));

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&temp_path)?;
    let written = file.write_all(data).and_then(|_| file.sync_all());
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    Ok(temp_path)
}

/// Replace `path` with `data` so that readers see either the old or the new
/// contents, never a partial file.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = write_temp(path, data)?;
    rename_with_fallback(&temp_path, path)?;
    if let Some(parent) = path.parent() {
        sync_dir(parent);
    }
    Ok(())
}

/// Whether a directory entry is a leftover in-flight write.
pub fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(TEMP_SUFFIX))
        .unwrap_or(false)
}

/// Remove leftover temp files in `dir`, returning how many were removed.
pub fn remove_temp_files(dir: &Path) -> io::Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err),
    };
    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if is_temp_file(&path) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Flush directory metadata so a completed rename survives power loss.
fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    {
        if let Ok(handle) = fs::File::open(dir) {
            let _ = handle.sync_all();
        }
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
}
