use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("settings directory missing or not writable: {0}")]
    Directory(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure `dir` exists as a directory, creating it if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Directory(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::Directory(e.to_string()))
}

/// Replaces `{dir}/{filename}` by writing a temp file in `dir` and renaming
/// it over the target, so readers never observe a partial file.
pub fn write_atomically(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    ensure_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
