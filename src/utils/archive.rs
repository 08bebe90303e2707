//! Zip archive writer
//!
//! Streams a collected file set into one zip archive. Individual files that
//! cannot be read are skipped; only failures of the archive itself abort.

use crate::error::{BackupError, Result};
use crate::managers::reporter::BackupReporter;
use crate::utils::collector::CollectedFileSet;
use crate::utils::paths::archive_top_level_name;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Extension of every backup archive
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Files with this suffix are expected to be held open by their owner
pub const LOCK_FILE_SUFFIX: &str = ".lock";

/// Highest supported compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Outcome of writing one archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveSummary {
    pub entries_written: usize,
    /// Relative paths that could not be read, lock files included
    pub skipped: Vec<String>,
}

fn entry_options(compression_level: u32) -> SimpleFileOptions {
    let options = SimpleFileOptions::default();
    if compression_level == 0 {
        options.compression_method(CompressionMethod::Stored)
    } else {
        options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level.min(MAX_COMPRESSION_LEVEL) as i64))
    }
}

/// Write `file_set` from `source_folder` into a new archive at `archive_path`
///
/// Entries are named `<top level>/<relative path>`, where the top level is the
/// source folder's name or `root` for the base folder. The caller is expected
/// to delete `archive_path` if this returns an error.
pub fn write_archive(
    source_folder: &Path,
    source_location: &str,
    archive_path: &Path,
    file_set: &CollectedFileSet,
    compression_level: u32,
    reporter: &dyn BackupReporter,
) -> Result<ArchiveSummary> {
    let top_level = archive_top_level_name(source_location);

    let file = File::create(archive_path)
        .map_err(|e| BackupError::archive_write(archive_path, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut summary = ArchiveSummary::default();

    for relative in &file_set.relative_paths {
        let source_path = source_folder.join(relative);

        let mut source = match File::open(&source_path) {
            Ok(source) => source,
            Err(e) => {
                skip_file(relative, &e, &mut summary, reporter);
                continue;
            }
        };

        let large_file = source
            .metadata()
            .map(|m| m.len() >= ZIP64_THRESHOLD)
            .unwrap_or(false);
        let entry_name = format!("{}/{}", top_level, relative);

        zip.start_file(entry_name, entry_options(compression_level).large_file(large_file))
            .map_err(|e| BackupError::archive_write(archive_path, e.into()))?;

        if let Err(e) = std::io::copy(&mut source, &mut zip) {
            zip.abort_file()
                .map_err(|abort| BackupError::archive_write(archive_path, abort.into()))?;
            skip_file(relative, &e, &mut summary, reporter);
            continue;
        }

        summary.entries_written += 1;
    }

    let mut writer = zip
        .finish()
        .map_err(|e| BackupError::archive_write(archive_path, e.into()))?;
    writer
        .flush()
        .map_err(|e| BackupError::archive_write(archive_path, e))?;

    debug!(
        "Wrote {} entries to {:?} ({} skipped)",
        summary.entries_written,
        archive_path,
        summary.skipped.len()
    );

    Ok(summary)
}

fn skip_file(
    relative: &str,
    error: &std::io::Error,
    summary: &mut ArchiveSummary,
    reporter: &dyn BackupReporter,
) {
    if !relative.ends_with(LOCK_FILE_SUFFIX) {
        reporter.file_skipped(relative, error);
    }
    summary.skipped.push(relative.to_string());
}
