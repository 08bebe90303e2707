//! Reporting seam for recoverable backup events
//!
//! Recoverable problems (skipped files, failed deletes, malformed archive names)
//! never abort an operation. They are handed to a `BackupReporter` instead so
//! callers decide how to surface them.

use std::path::Path;
use tracing::{error, info, warn};

/// Receives recoverable events from backup creation and pruning
pub trait BackupReporter: Send + Sync {
    /// An archive name did not match the format; its modification time was used instead
    fn format_mismatch(&self, file_name: &str);

    /// A blacklist pattern excluded `count` files
    fn blacklisted_files(&self, pattern: &str, count: usize);

    /// `count` files were skipped because they live inside the backup storage folder
    fn files_in_backup_folder(&self, count: usize);

    /// A collected file could not be read into the archive
    fn file_skipped(&self, relative_path: &str, error: &std::io::Error);

    /// A directory entry could not be read while walking the source folder
    fn entry_unreadable(&self, path: Option<&Path>, error: &str);

    /// More archives exist than the retention limit allows
    fn backup_limit_reached(&self, count: usize, limit: usize);

    /// An archive selected for pruning could not be deleted
    fn delete_failed(&self, file_name: &str, error: &std::io::Error);

    /// Pruning stopped because of an unexpected error
    fn prune_failed(&self, error: &str);
}

/// Default reporter emitting `tracing` events
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl BackupReporter for TracingReporter {
    fn format_mismatch(&self, file_name: &str) {
        warn!(
            file_name,
            "Backup file name does not match the date format, using its modification time"
        );
    }

    fn blacklisted_files(&self, pattern: &str, count: usize) {
        info!(pattern, count, "Didn't include {} file(s) matching blacklist pattern", count);
    }

    fn files_in_backup_folder(&self, count: usize) {
        info!(count, "Didn't include {} file(s) already in the backup folder", count);
    }

    fn file_skipped(&self, relative_path: &str, error: &std::io::Error) {
        warn!(path = relative_path, %error, "Failed to include file in backup");
    }

    fn entry_unreadable(&self, path: Option<&Path>, error: &str) {
        warn!(path = ?path, error, "Failed to read entry while collecting files");
    }

    fn backup_limit_reached(&self, count: usize, limit: usize) {
        info!(
            count,
            limit,
            "There are {} local backups, deleting oldest to keep {}",
            count,
            limit
        );
    }

    fn delete_failed(&self, file_name: &str, error: &std::io::Error) {
        warn!(file_name, %error, "Failed to delete local backup");
    }

    fn prune_failed(&self, error: &str) {
        error!(error, "Failed to prune local backups");
    }
}

/// Recording reporter for tests
/// Available for use in external test crates
#[allow(dead_code)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A recorded report
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ReportEvent {
        FormatMismatch { file_name: String },
        BlacklistedFiles { pattern: String, count: usize },
        FilesInBackupFolder { count: usize },
        FileSkipped { relative_path: String },
        EntryUnreadable { path: Option<String> },
        BackupLimitReached { count: usize, limit: usize },
        DeleteFailed { file_name: String },
        PruneFailed { error: String },
    }

    /// Reporter that stores every event it receives
    #[derive(Clone, Default)]
    pub struct RecordingReporter {
        pub events: Arc<Mutex<Vec<ReportEvent>>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all recorded events
        pub fn get_events(&self) -> Vec<ReportEvent> {
            self.events.lock().unwrap().clone()
        }

        /// Paths reported as skipped during archiving
        pub fn skipped_files(&self) -> Vec<String> {
            self.get_events()
                .into_iter()
                .filter_map(|e| match e {
                    ReportEvent::FileSkipped { relative_path } => Some(relative_path),
                    _ => None,
                })
                .collect()
        }

        /// Archive names reported as not matching the date format
        pub fn format_mismatches(&self) -> Vec<String> {
            self.get_events()
                .into_iter()
                .filter_map(|e| match e {
                    ReportEvent::FormatMismatch { file_name } => Some(file_name),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, event: ReportEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl BackupReporter for RecordingReporter {
        fn format_mismatch(&self, file_name: &str) {
            self.record(ReportEvent::FormatMismatch {
                file_name: file_name.to_string(),
            });
        }

        fn blacklisted_files(&self, pattern: &str, count: usize) {
            self.record(ReportEvent::BlacklistedFiles {
                pattern: pattern.to_string(),
                count,
            });
        }

        fn files_in_backup_folder(&self, count: usize) {
            self.record(ReportEvent::FilesInBackupFolder { count });
        }

        fn file_skipped(&self, relative_path: &str, _error: &std::io::Error) {
            self.record(ReportEvent::FileSkipped {
                relative_path: relative_path.to_string(),
            });
        }

        fn entry_unreadable(&self, path: Option<&Path>, _error: &str) {
            self.record(ReportEvent::EntryUnreadable {
                path: path.map(|p| p.display().to_string()),
            });
        }

        fn backup_limit_reached(&self, count: usize, limit: usize) {
            self.record(ReportEvent::BackupLimitReached { count, limit });
        }

        fn delete_failed(&self, file_name: &str, _error: &std::io::Error) {
            self.record(ReportEvent::DeleteFailed {
                file_name: file_name.to_string(),
            });
        }

        fn prune_failed(&self, error: &str) {
            self.record(ReportEvent::PruneFailed {
                error: error.to_string(),
            });
        }
    }
}
