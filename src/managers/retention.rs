//! Local backup index and retention
//!
//! Archives are indexed by the creation time encoded in their file name. Names
//! that do not match the date format fall back to the file's modification
//! time. Pruning repeatedly removes the oldest indexed archive until the
//! retention limit is met.

use crate::error::{BackupError, Result};
use crate::managers::reporter::BackupReporter;
use crate::utils::archive::ARCHIVE_EXTENSION;
use crate::utils::paths::backup_subfolder;
use crate::utils::timestamp::TimestampCodec;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

/// Archives keyed by creation time in epoch seconds
///
/// Two archives resolving to the same second collide; the one listed last
/// wins and the other is left out of the index (it stays on disk).
pub type ArchiveIndex = BTreeMap<i64, PathBuf>;

/// Result of a prune run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    /// Archives still indexed after pruning
    pub remaining: usize,
}

/// Folder holding the archives for `location`
pub fn backup_folder(storage_root: &Path, location: &str) -> PathBuf {
    storage_root.join(backup_subfolder(location))
}

/// Index the archives stored for `location`
pub fn list_backups(
    storage_root: &Path,
    location: &str,
    codec: &TimestampCodec,
    reporter: &dyn BackupReporter,
) -> Result<ArchiveIndex> {
    let folder = backup_folder(storage_root, location);
    let mut index = ArchiveIndex::new();

    let entries = match fs::read_dir(&folder) {
        Ok(entries) => entries,
        // No backups have been written for this location yet
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(index),
        Err(e) => return Err(BackupError::io(&folder, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| BackupError::io(&folder, e))?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !file_name.ends_with(ARCHIVE_EXTENSION) || !path.is_file() {
            continue;
        }

        let key = match codec.parse(&file_name) {
            Ok(created) => created.timestamp(),
            Err(_) => {
                reporter.format_mismatch(&file_name);
                modified_seconds(&path)
            }
        };

        if let Some(previous) = index.insert(key, path) {
            debug!(
                "Archive {:?} shares timestamp {} with another archive, dropped from index",
                previous, key
            );
        }
    }

    Ok(index)
}

/// Delete the oldest archives of `location` beyond `keep_count`
///
/// A negative `keep_count` (normally -1) disables pruning. Failures never
/// propagate: a failed delete is reported and pruning moves on to the next
/// archive, and a listing failure is reported and ends the run.
pub fn prune(
    storage_root: &Path,
    location: &str,
    codec: &TimestampCodec,
    keep_count: i64,
    reporter: &dyn BackupReporter,
) -> PruneOutcome {
    prune_with(storage_root, location, codec, keep_count, reporter, |path| {
        fs::remove_file(path)
    })
}

/// Prune using `remove` to delete each archive
pub(crate) fn prune_with<F>(
    storage_root: &Path,
    location: &str,
    codec: &TimestampCodec,
    keep_count: i64,
    reporter: &dyn BackupReporter,
    mut remove: F,
) -> PruneOutcome
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let keep = match usize::try_from(keep_count) {
        Ok(keep) => keep,
        Err(_) => {
            debug!("Retention disabled for '{}'", location);
            return PruneOutcome::default();
        }
    };

    let mut index = match list_backups(storage_root, location, codec, reporter) {
        Ok(index) => index,
        Err(e) => {
            reporter.prune_failed(&e.to_string());
            return PruneOutcome::default();
        }
    };

    if index.len() > keep {
        reporter.backup_limit_reached(index.len(), keep);
    }

    let mut outcome = PruneOutcome::default();

    while index.len() > keep {
        let Some((_, oldest)) = index.pop_first() else {
            break;
        };

        match remove(&oldest) {
            Ok(()) => {
                info!("Deleted old backup {:?}", oldest);
                outcome.deleted.push(oldest);
            }
            Err(e) => {
                let name = oldest
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| oldest.display().to_string());
                reporter.delete_failed(&name, &e);
                outcome.failed.push(oldest);
            }
        }
    }

    outcome.remaining = index.len();
    outcome
}

fn modified_seconds(path: &Path) -> i64 {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(_) => return 0,
    };

    match modified.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}
