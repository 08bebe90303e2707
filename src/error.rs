//! Error types for backup creation, listing and pruning

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Invalid backup location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("Invalid blacklist pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to write archive {path:?}: {source}")]
    ArchiveWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File name '{file_name}' does not match format '{pattern}'")]
    FormatMismatch { file_name: String, pattern: String },

    #[error("Invalid file name format '{pattern}'")]
    InvalidFormat { pattern: String },

    #[error("Invalid time zone '{value}' (expected \"UTC\", \"local\" or an offset like \"+02:00\")")]
    InvalidTimeZone { value: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BackupError>;

impl BackupError {
    pub(crate) fn invalid_location(location: &str, reason: impl Into<String>) -> Self {
        BackupError::InvalidLocation {
            location: location.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn archive_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackupError::ArchiveWriteFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackupError::Io {
            path: path.into(),
            source,
        }
    }
}
