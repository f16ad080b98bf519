//! File-backed storage backend.

use super::KeyValueStorage;
use crate::error::{Result, TrackerError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Extension for slot files.
const SLOT_EXTENSION: &str = "json";

/// Name of the advisory lock file serializing writers.
const LOCK_FILE: &str = "LOCK";

/// Key-value storage keeping each key in its own file under a directory.
///
/// Writes replace the slot atomically (temp file, sync, rename). Concurrent
/// writers, including other processes, are serialized through an exclusive
/// lock on `LOCK`; the last write wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for slot files.
    path: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `path`.
    pub fn open(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.is_dir() {
            if !create_if_missing {
                return Err(TrackerError::NotInitialized);
            }
            fs::create_dir_all(&path)?;
        }

        Ok(Self { path })
    }

    /// Base directory of this storage.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File backing `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.path.join(format!("{key}.{SLOT_EXTENSION}")))
    }

    fn acquire_lock(&self) -> Result<File> {
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.path.join(LOCK_FILE))?;

        lock_file.lock_exclusive()?;

        Ok(lock_file)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slot = self.slot_path(key)?;
        match fs::read_to_string(&slot) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let slot = self.slot_path(key)?;
        let tmp = slot.with_extension(format!("{SLOT_EXTENSION}.tmp"));

        let lock = self.acquire_lock()?;

        let mut file = File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &slot)?;

        FileExt::unlock(&lock)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let slot = self.slot_path(key)?;
        let _lock = self.acquire_lock()?;

        match fs::remove_file(&slot) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if !valid {
        return Err(TrackerError::InvalidKey(key.to_string()));
    }
    Ok(())
}
