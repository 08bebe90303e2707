//! Fluent API for building test configurations
//!
//! Provides a builder pattern for creating test configurations with sensible defaults.

use local_backup_manager::config::{Config, GlobalConfig, LocationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct ConfigBuilder {
    temp_dir: TempDir,
    global: GlobalConfig,
    locations: Vec<LocationConfig>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with minimal defaults
    ///
    /// The source root is `<temp>/server` and archives go to `<temp>/server/backups`,
    /// so the storage folder sits inside the base folder like a typical install.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let source_root = temp_dir.path().join("server");
        fs::create_dir_all(&source_root).expect("Failed to create source root");

        // Create log directory
        let log_directory = temp_dir.path().join("logs");
        fs::create_dir_all(&log_directory).expect("Failed to create log_directory");

        let global = GlobalConfig {
            storage_directory: source_root.join("backups"),
            source_root,
            zip_compression: 1,
            keep_count: -1,
            time_zone: "UTC".to_string(),
            file_name_format: "Backup-%Y-%m-%d--%H-%M-%S.zip".to_string(),
            default_blacklist: vec![],
            log_directory,
            log_level: "debug".to_string(),
            log_max_files: 5,
        };

        Self {
            temp_dir,
            global,
            locations: Vec::new(),
        }
    }

    /// Create a minimal config with a single `world` location
    pub fn minimal() -> Self {
        Self::new().add_location("world")
    }

    /// Set the storage directory
    pub fn with_storage_dir(mut self, path: &Path) -> Self {
        self.global.storage_directory = path.to_path_buf();
        self
    }

    /// Set the log directory
    pub fn with_log_dir(mut self, path: &Path) -> Self {
        self.global.log_directory = path.to_path_buf();
        self
    }

    /// Set the zip compression level
    pub fn with_compression(mut self, level: u32) -> Self {
        self.global.zip_compression = level;
        self
    }

    /// Set the global keep count
    pub fn with_keep_count(mut self, keep_count: i64) -> Self {
        self.global.keep_count = keep_count;
        self
    }

    /// Set the global file name format
    pub fn with_format(mut self, format: &str) -> Self {
        self.global.file_name_format = format.to_string();
        self
    }

    /// Set the global blacklist
    pub fn with_default_blacklist(mut self, patterns: &[&str]) -> Self {
        self.global.default_blacklist = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Add a simple path location
    pub fn add_location(mut self, path: &str) -> Self {
        self.locations.push(LocationConfig {
            path: Some(path.to_string()),
            create: true,
            ..Default::default()
        });
        self
    }

    /// Add a glob location
    pub fn add_glob_location(mut self, glob: &str) -> Self {
        self.locations.push(LocationConfig {
            glob: Some(glob.to_string()),
            create: true,
            ..Default::default()
        });
        self
    }

    /// Add a location that is only pruned, never backed up
    pub fn add_prune_only_location(mut self, path: &str, keep_count: i64) -> Self {
        self.locations.push(LocationConfig {
            path: Some(path.to_string()),
            create: false,
            keep_count: Some(keep_count),
            ..Default::default()
        });
        self
    }

    /// Add a location with full configuration
    pub fn add_location_config(mut self, location: LocationConfig) -> Self {
        self.locations.push(location);
        self
    }

    /// Get the temp directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the source root
    pub fn source_root(&self) -> PathBuf {
        self.global.source_root.clone()
    }

    /// Get the storage directory
    pub fn storage_dir(&self) -> PathBuf {
        self.global.storage_directory.clone()
    }

    /// Build the Config
    pub fn build(self) -> Config {
        Config {
            global: self.global,
            locations: self.locations,
        }
    }

    /// Keep the temp directory (don't delete on drop)
    pub fn persist(self) -> (Config, TempDir) {
        let config = Config {
            global: self.global,
            locations: self.locations,
        };
        (config, self.temp_dir)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
