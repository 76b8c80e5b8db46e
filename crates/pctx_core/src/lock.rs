//! Exclusive store lock held across load + mutate + save.

use crate::error::{PctxError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// RAII guard for the store lock.
///
/// Holds an exclusive advisory lock on the lock file. The lock is released
/// when the guard is dropped. The file itself is left in place.
pub(crate) struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquires the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns `StoreLocked` if another handle already holds it.
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        file.try_lock_exclusive()
            .map_err(|_| PctxError::StoreLocked {
                path: path.to_path_buf(),
            })?;

        debug!(path = %path.display(), "acquired store lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(path = %self.path.display(), "released store lock");
    }
}
