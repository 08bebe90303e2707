//! Collects the files that go into a backup archive
//!
//! The source folder is walked depth first. Every regular file is either
//! counted as living inside the backup storage folder, counted against the
//! first blacklist pattern it matches, or recorded by its path relative to the
//! source folder. Directories are always descended into; blacklist patterns
//! filter files, never whole subtrees.

use crate::managers::reporter::BackupReporter;
use crate::utils::exclusion::{ExclusionEntry, ExclusionList};
use crate::utils::paths::to_slash_path;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Files selected for one backup run
#[derive(Debug, Default)]
pub struct CollectedFileSet {
    /// '/'-separated paths relative to the source folder, in walk order
    pub relative_paths: Vec<String>,
    /// Files skipped because they live inside the backup storage folder
    pub files_in_backup_folder: usize,
    /// Blacklist entries with their hit counts
    pub exclusions: Vec<ExclusionEntry>,
}

impl CollectedFileSet {
    pub fn len(&self) -> usize {
        self.relative_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relative_paths.is_empty()
    }

    pub fn blacklisted(&self) -> usize {
        self.exclusions.iter().map(|e| e.match_count()).sum()
    }
}

/// Walk `source_folder` and select the files to archive
///
/// `backup_storage_root` must already exist; it is canonicalized once and
/// every file's canonical path is compared against it component-wise.
pub fn collect(
    source_folder: &Path,
    mut exclusions: ExclusionList,
    backup_storage_root: &Path,
    reporter: &dyn BackupReporter,
) -> CollectedFileSet {
    let storage_root = backup_storage_root
        .canonicalize()
        .unwrap_or_else(|_| backup_storage_root.to_path_buf());

    let mut relative_paths = Vec::new();
    let mut seen = HashSet::new();
    let mut files_in_backup_folder = 0;

    let walker = WalkDir::new(source_folder)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                reporter.entry_unreadable(e.path(), &e.to_string());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // Verify not backing up previous backups
        let canonical = entry
            .path()
            .canonicalize()
            .unwrap_or_else(|_| entry.path().to_path_buf());
        if canonical.starts_with(&storage_root) {
            files_in_backup_folder += 1;
            continue;
        }

        let relative = match entry.path().strip_prefix(source_folder) {
            Ok(relative) => to_slash_path(relative),
            Err(_) => continue,
        };

        if let Some(pattern) = exclusions.first_match(&relative) {
            debug!("Blacklisted '{}' (pattern '{}')", relative, pattern);
            continue;
        }

        if seen.insert(relative.clone()) {
            relative_paths.push(relative);
        }
    }

    CollectedFileSet {
        relative_paths,
        files_in_backup_folder,
        exclusions: exclusions.into_entries(),
    }
}
