//! Backup manager - creates local archives and enforces retention

use crate::config::{expand_tilde, Config, LocationTarget, ResolvedLocation};
use crate::error::{BackupError, Result};
use crate::managers::reporter::{BackupReporter, TracingReporter};
use crate::managers::retention::{self, ArchiveIndex, PruneOutcome};
use crate::utils::archive::{self, ArchiveSummary};
use crate::utils::collector;
use crate::utils::exclusion::ExclusionList;
use crate::utils::locker::{lock_path, with_location_lock};
use crate::utils::paths::{backup_subfolder, find_glob_folders, to_slash_path, validate_location};
use crate::utils::timestamp::{TimeZoneSetting, TimestampCodec};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Result of a successful backup
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub archive_path: PathBuf,
    pub entries_written: usize,
    /// Files that could not be read into the archive
    pub skipped: Vec<String>,
    /// Files excluded by blacklist patterns
    pub blacklisted: usize,
    /// Files excluded because they live inside the backup storage folder
    pub files_in_backup_folder: usize,
}

pub struct BackupManager {
    config: Config,
    locations: Vec<ResolvedLocation>,
    reporter: Box<dyn BackupReporter>,
}

impl BackupManager {
    /// Create new backup manager reporting through `tracing`
    pub fn new(config: Config, locations: Vec<ResolvedLocation>) -> Self {
        Self::with_reporter(config, locations, TracingReporter::new())
    }

    /// Create backup manager with a specific reporter
    pub fn with_reporter<R: BackupReporter + 'static>(
        config: Config,
        locations: Vec<ResolvedLocation>,
        reporter: R,
    ) -> Self {
        Self {
            config,
            locations,
            reporter: Box::new(reporter),
        }
    }

    /// Folder that all archives are stored under
    pub fn storage_root(&self) -> PathBuf {
        expand_tilde(&self.config.global.storage_directory)
    }

    /// Base folder that locations are relative to
    pub fn source_root(&self) -> PathBuf {
        expand_tilde(&self.config.global.source_root)
    }

    /// Build a timestamp codec for `format` in the configured time zone
    pub fn codec(&self, format: &str) -> Result<TimestampCodec> {
        let zone = self.config.global.time_zone.parse::<TimeZoneSetting>()?;
        TimestampCodec::new(format, zone)
    }

    /// Create a new archive of `location`, named after the current time
    pub fn create_backup(
        &self,
        location: &str,
        codec: &TimestampCodec,
        blacklist: &[String],
    ) -> Result<BackupReport> {
        self.create_backup_at(location, codec, blacklist, Utc::now())
    }

    /// Create a new archive of `location`, named after `now`
    pub fn create_backup_at(
        &self,
        location: &str,
        codec: &TimestampCodec,
        blacklist: &[String],
        now: DateTime<Utc>,
    ) -> Result<BackupReport> {
        validate_location(location)?;

        let source_folder = self.source_root().join(location);
        if !source_folder.is_dir() {
            return Err(BackupError::invalid_location(
                location,
                format!("source folder {:?} does not exist", source_folder),
            ));
        }

        let exclusions = ExclusionList::compile(blacklist)?;

        let storage_root = self.storage_root();
        let target_dir = storage_root.join(backup_subfolder(location));
        fs::create_dir_all(&target_dir)
            .map_err(|e| BackupError::archive_write(&target_dir, e))?;

        info!("Collecting files for backup of '{}'", location);
        let file_set = collector::collect(&source_folder, exclusions, &storage_root, &*self.reporter);

        for entry in &file_set.exclusions {
            if entry.match_count() > 0 {
                self.reporter
                    .blacklisted_files(entry.pattern(), entry.match_count());
            }
        }

        if file_set.files_in_backup_folder > 0 {
            self.reporter
                .files_in_backup_folder(file_set.files_in_backup_folder);
        }

        let archive_path = target_dir.join(codec.archive_name(&now));
        info!(
            "Writing {} files from '{}' to {:?}",
            file_set.len(),
            location,
            archive_path
        );

        let summary: ArchiveSummary = match archive::write_archive(
            &source_folder,
            location,
            &archive_path,
            &file_set,
            self.config.global.zip_compression,
            &*self.reporter,
        ) {
            Ok(summary) => summary,
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&archive_path) {
                    warn!(
                        "Failed to remove partial archive {:?}: {}",
                        archive_path, remove_err
                    );
                }
                return Err(e);
            }
        };

        Ok(BackupReport {
            archive_path,
            entries_written: summary.entries_written,
            skipped: summary.skipped,
            blacklisted: file_set.blacklisted(),
            files_in_backup_folder: file_set.files_in_backup_folder,
        })
    }

    /// Index the archives stored for `location`
    pub fn list_backups(&self, location: &str, codec: &TimestampCodec) -> Result<ArchiveIndex> {
        retention::list_backups(&self.storage_root(), location, codec, &*self.reporter)
    }

    /// Delete the oldest archives of `location` beyond `keep_count`
    pub fn prune_backups(
        &self,
        location: &str,
        codec: &TimestampCodec,
        keep_count: i64,
    ) -> PruneOutcome {
        retention::prune(
            &self.storage_root(),
            location,
            codec,
            keep_count,
            &*self.reporter,
        )
    }

    /// Back up and prune one configured location
    ///
    /// Glob locations are expanded to every matching folder. Each folder is
    /// processed under its own lock so concurrent runs cannot race on it.
    pub fn run_location(&self, location: &ResolvedLocation) -> anyhow::Result<()> {
        let codec = self
            .codec(&location.format)
            .with_context(|| format!("Invalid format for '{}'", location.target.as_str()))?;

        let folders = self.expand_location(location)?;
        if folders.is_empty() {
            warn!("No folders match '{}'", location.target.as_str());
            return Ok(());
        }

        let storage_root = self.storage_root();
        let mut errors = Vec::new();

        for folder in folders {
            let lock = lock_path(&storage_root, &backup_subfolder(&folder));
            let result = with_location_lock(&lock, || self.run_folder(&folder, location, &codec));

            if let Err(e) = result {
                error!("Backup of '{}' failed: {:#}", folder, e);
                errors.push(format!("{}: {:#}", folder, e));
            }
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Backup failed for {} folder(s): {}",
                errors.len(),
                errors.join(", ")
            );
        }

        Ok(())
    }

    fn run_folder(
        &self,
        folder: &str,
        location: &ResolvedLocation,
        codec: &TimestampCodec,
    ) -> anyhow::Result<()> {
        let start_time = Instant::now();

        if location.create {
            let report = self
                .create_backup(folder, codec, &location.blacklist)
                .with_context(|| format!("Failed to create backup of '{}'", folder))?;

            info!(
                "Created backup {:?} with {} files in {:.2}s",
                report.archive_path,
                report.entries_written,
                start_time.elapsed().as_secs_f64()
            );
        }

        let outcome = self.prune_backups(folder, codec, location.keep_count);
        if !outcome.deleted.is_empty() {
            info!(
                "Pruned {} old backup(s) of '{}'",
                outcome.deleted.len(),
                folder
            );
        }

        Ok(())
    }

    fn expand_location(&self, location: &ResolvedLocation) -> anyhow::Result<Vec<String>> {
        match &location.target {
            LocationTarget::Path(path) => Ok(vec![path.clone()]),
            LocationTarget::Glob(glob) => {
                let source_root = self.source_root();
                let folders = find_glob_folders(glob, &source_root, &self.storage_root())
                    .with_context(|| format!("Failed to expand glob '{}'", glob))?;

                Ok(folders
                    .iter()
                    .filter_map(|folder| folder.strip_prefix(&source_root).ok())
                    .map(to_slash_path)
                    .collect())
            }
        }
    }

    /// Run backups for all configured locations
    pub fn backup_all(&self) -> anyhow::Result<()> {
        info!("Starting backup for all configured locations");

        if self.locations.is_empty() {
            warn!("No locations configured");
            return Ok(());
        }

        let mut success_count = 0;
        let mut failure_count = 0;
        let mut errors = Vec::new();

        for location in &self.locations {
            match self.run_location(location) {
                Ok(_) => {
                    success_count += 1;
                }
                Err(e) => {
                    failure_count += 1;
                    errors.push(format!("{}: {:#}", location.target.as_str(), e));
                }
            }
        }

        info!(
            "Backup summary: {} succeeded, {} failed",
            success_count, failure_count
        );

        if failure_count > 0 {
            anyhow::bail!(
                "{} location(s) failed to back up:\n{}",
                failure_count,
                errors.join("\n")
            );
        }

        Ok(())
    }

    /// Get the configured locations
    pub fn locations(&self) -> &[ResolvedLocation] {
        &self.locations
    }
}
