//! Test fixtures and sample data
//!
//! Provides pre-built test data and templates for testing.

use chrono::{DateTime, Duration, TimeZone, Utc};
use local_backup_manager::utils::timestamp::TimestampCodec;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Minimal valid config TOML template
pub fn minimal_config_toml() -> &'static str {
    r#"
[global]
storage_directory = "{storage_dir}"
source_root = "{source_root}"
log_directory = "{log_dir}"

[[locations]]
path = "world"
"#
}

/// Config with several locations and overrides
pub fn multi_location_config_toml() -> &'static str {
    r#"
[global]
storage_directory = "{storage_dir}"
source_root = "{source_root}"
log_directory = "{log_dir}"
keep_count = 5
default_blacklist = ["*.lock"]

[[locations]]
path = "world"
blacklist = ["logs/**"]

[[locations]]
glob = "plugins/*"
keep_count = 2

[[locations]]
path = "archive"
create = false
keep_count = 1
"#
}

/// Fill a config template with concrete paths
pub fn render_config(template: &str, storage_dir: &Path, source_root: &Path, log_dir: &Path) -> String {
    template
        .replace("{storage_dir}", &storage_dir.display().to_string())
        .replace("{source_root}", &source_root.display().to_string())
        .replace("{log_dir}", &log_dir.display().to_string())
}

/// A fixed instant used by tests that name archives
pub fn sample_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap()
}

/// `count` instants one hour apart, oldest first
pub fn sample_instants(count: usize) -> Vec<DateTime<Utc>> {
    (0..count)
        .map(|i| sample_instant() + Duration::hours(i as i64))
        .collect()
}

/// Create a world-like folder structure
///
/// ```text
/// world/level.dat
/// world/region/r.0.0.mca
/// world/region/r.0.1.mca
/// world/logs/latest.log
/// world/session.lock
/// ```
pub fn create_world_data(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir.join("region"))?;
    fs::create_dir_all(dir.join("logs"))?;

    fs::write(dir.join("level.dat"), "level data")?;
    fs::write(dir.join("region/r.0.0.mca"), "region 0 0")?;
    fs::write(dir.join("region/r.0.1.mca"), "region 0 1")?;
    fs::write(dir.join("logs/latest.log"), "log line")?;
    fs::write(dir.join("session.lock"), "lock")?;

    Ok(())
}

/// Relative paths created by [`create_world_data`]
pub fn world_data_files() -> Vec<&'static str> {
    vec![
        "level.dat",
        "logs/latest.log",
        "region/r.0.0.mca",
        "region/r.0.1.mca",
        "session.lock",
    ]
}

/// Write an empty archive named after `instant` into `folder`
pub fn create_archive_at(
    folder: &Path,
    codec: &TimestampCodec,
    instant: &DateTime<Utc>,
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    let path = folder.join(codec.archive_name(instant));
    let writer = zip::ZipWriter::new(File::create(&path)?);
    writer.finish().map_err(std::io::Error::other)?;
    Ok(path)
}

/// Names of every entry in an archive, sorted
pub fn archive_entry_names(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    names.sort();
    Ok(names)
}

/// Read one entry of an archive as a string
pub fn read_archive_entry(path: &Path, name: &str) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut entry = archive.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// List the `.zip` files in a folder, sorted by name
pub fn list_archives(folder: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(folder)? {
        let name = entry?.file_name().to_string_lossy().to_string();
        if name.ends_with(".zip") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
