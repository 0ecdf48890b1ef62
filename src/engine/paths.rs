//! Path materialization for the directory and file tiers.
//!
//! Creation is idempotent. A path that exists with the wrong kind is an
//! error, as is any I/O failure; none of these are retried.

use crate::error::GenError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Ensure `path` exists as a directory, creating missing ancestors
pub fn ensure_directory(path: &Path) -> Result<(), GenError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(GenError::NotADirectory(path.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            create_dir_all(path).map_err(|e| GenError::io(path, e))?;
            info!(path = %path.display(), "Created directory");
            Ok(())
        }
        Err(err) => Err(GenError::io(path, err)),
    }
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o750).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

/// Ensure the parent of `path` exists and `path` itself is not a directory
pub fn prepare_file(path: &Path) -> Result<(), GenError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(GenError::NotAFile(path.to_path_buf())),
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(GenError::io(path, err)),
    }
}

/// Truncate and rewrite `path` with `contents`
pub fn write_file(path: &Path, contents: &str) -> Result<(), GenError> {
    prepare_file(path)?;
    fs::write(path, contents).map_err(|e| GenError::io(path, e))
}
