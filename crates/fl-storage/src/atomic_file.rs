use crate::{BACKUP_DATE_FORMAT, FileOperation, LOCK_SUFFIX, StorageError, StorageResult};

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

/// Writes `contents` to `path` using the atomic write pattern.
///
/// 1. Writes to a uniquely named temp file in the same directory
/// 2. Syncs to disk (fsync)
/// 3. Atomic rename to final location
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> StorageResult<()> {
    let dir = ensure_parent_dir(path)?;

    let mut temp =
        NamedTempFile::new_in(&dir).map_err(|e| StorageError::io(FileOperation::Write, &dir, e))?;

    temp.write_all(contents)
        .map_err(|e| StorageError::io(FileOperation::Write, temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io(FileOperation::Write, temp.path(), e))?;

    // A failed persist drops the temp file, which removes it.
    temp.persist(path)
        .map_err(|e| StorageError::io(FileOperation::Replace, path, e.error))?;
    Ok(())
}

/// Reads `path`, returning `None` when it does not exist.
pub(crate) fn read_if_exists(path: &Path) -> StorageResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| StorageError::io(FileOperation::Read, path, e))
}

/// Renames a corrupted file to `<name>.corrupted.<timestamp>`.
pub(crate) fn backup_corrupted(path: &Path) -> StorageResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = chrono::Utc::now().format(BACKUP_DATE_FORMAT);
    let backup_path = with_suffix(path, &format!(".corrupted.{timestamp}"));

    fs::rename(path, &backup_path).map_err(|e| StorageError::io(FileOperation::Backup, path, e))?;

    warn!("Backed up corrupted file to {backup_path:?}");
    Ok(Some(backup_path))
}

/// Exclusive advisory lock on `<path>.lock`, shared by every handle and
/// process using `path`. Released on drop.
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    /// Blocks until the lock for `path` is held.
    pub(crate) fn exclusive(path: &Path) -> StorageResult<Self> {
        ensure_parent_dir(path)?;
        let lock_path = with_suffix(path, LOCK_SUFFIX);

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StorageError::io(FileOperation::Lock, &lock_path, e))?;
        file.lock()
            .map_err(|e| StorageError::io(FileOperation::Lock, &lock_path, e))?;

        debug!("Locked {lock_path:?}");
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn ensure_parent_dir(path: &Path) -> StorageResult<PathBuf> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| StorageError::io(FileOperation::CreateDir, &dir, e))?;
    Ok(dir)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or(OsStr::new("")).to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}
