use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Folder that all archives are stored under
    #[serde(default = "default_storage_directory")]
    pub storage_directory: PathBuf,

    /// Base folder that backup locations are relative to
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Zip compression level (0 = store, 9 = smallest)
    #[serde(default = "default_zip_compression")]
    pub zip_compression: u32,

    /// Number of archives to keep per location (-1 keeps all)
    #[serde(default = "default_keep_count")]
    pub keep_count: i64,

    /// Time zone used for archive names ("UTC", "local" or "+02:00")
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Default archive file name format
    #[serde(default = "default_file_name_format")]
    pub file_name_format: String,

    /// Blacklist patterns applied to every location
    #[serde(default)]
    pub default_blacklist: Vec<String>,

    /// Logging configuration
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            storage_directory: default_storage_directory(),
            source_root: default_source_root(),
            zip_compression: default_zip_compression(),
            keep_count: default_keep_count(),
            time_zone: default_time_zone(),
            file_name_format: default_file_name_format(),
            default_blacklist: Vec::new(),
            log_directory: default_log_directory(),
            log_level: default_log_level(),
            log_max_files: default_log_max_files(),
        }
    }
}

/// A folder (or glob of folders) to back up
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Folder relative to the source root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Glob selecting folders relative to the source root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,

    /// Archive file name format override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Create new archives (false = only prune existing ones)
    #[serde(default = "default_create")]
    pub create: bool,

    /// Retention override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_count: Option<i64>,

    /// Blacklist patterns for this location
    #[serde(default)]
    pub blacklist: Vec<String>,
}

/// What a resolved location points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationTarget {
    Path(String),
    Glob(String),
}

impl LocationTarget {
    pub fn as_str(&self) -> &str {
        match self {
            LocationTarget::Path(p) | LocationTarget::Glob(p) => p,
        }
    }
}

/// Resolved location configuration (after merging with global defaults)
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub target: LocationTarget,
    pub format: String,
    pub create: bool,
    pub keep_count: i64,
    pub blacklist: Vec<String>,
}

// Default value functions

fn default_storage_directory() -> PathBuf { PathBuf::from("backups") }
fn default_source_root() -> PathBuf { PathBuf::from(".") }
fn default_zip_compression() -> u32 { 1 }
fn default_keep_count() -> i64 { -1 }
fn default_time_zone() -> String { "UTC".to_string() }
fn default_file_name_format() -> String { "Backup-%Y-%m-%d--%H-%M-%S.zip".to_string() }
fn default_log_directory() -> PathBuf { PathBuf::from("~/logs") }
fn default_log_level() -> String { "info".to_string() }
fn default_log_max_files() -> u32 { 10 }
fn default_create() -> bool { true }
