//! File-based locking to prevent concurrent work on one backup location

use anyhow::{Context, Result};
use fd_lock::RwLock;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the lock kept inside each location's backup folder
pub const LOCK_FILE_NAME: &str = ".backup.lock";

/// Lock file guarding the archives of one location
///
/// The lock lives next to the archives it guards, so distinct sub-folders
/// never share a lock.
pub fn lock_path(storage_root: &Path, subfolder: &str) -> PathBuf {
    storage_root.join(subfolder).join(LOCK_FILE_NAME)
}

/// Run `f` while holding an exclusive lock on `lock_path`
///
/// Fails immediately if another process or thread holds the lock.
pub fn with_location_lock<T, F>(lock_path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    debug!("Attempting to acquire lock: {:?}", lock_path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create lock directory")?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

    let mut lock = RwLock::new(file);
    let result = {
        let _guard = lock.try_write().with_context(|| {
            format!("Backup location is already in use (lock held): {:?}", lock_path)
        })?;

        info!("Acquired backup lock: {:?}", lock_path);
        f()
    };

    info!("Released backup lock: {:?}", lock_path);
    result
}
