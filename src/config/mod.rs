//! Configuration module for local-backup-manager
//!
//! This module handles loading, validating, and resolving configuration from TOML files.
//!
//! ## Location Settings
//!
//! Settings are applied in this order (later overrides earlier):
//! 1. Global defaults
//! 2. Location-level settings
//!
//! Blacklists are not overridden but concatenated: global patterns first.
//!
//! ## Example Usage
//!
//! ```no_run
//! use local_backup_manager::config;
//!
//! let config = config::load_config("backup-config.toml")?;
//! let locations = config::resolve_all_locations(&config)?;
//!
//! for location in locations {
//!     println!("Location: {}, keep: {}", location.target.as_str(), location.keep_count);
//! }
//! # Ok::<(), config::ConfigError>(())
//! ```

mod loader;
mod types;

pub use loader::{
    load_config, parse_time_zone, resolve_all_locations, resolve_location, validate_config,
    ConfigError, Result,
};
pub use types::*;

/// Get the merged blacklist for a location
/// This combines global default_blacklist with location-specific patterns
pub fn get_effective_blacklist(location: &LocationConfig, global: &GlobalConfig) -> Vec<String> {
    let mut blacklist = global.default_blacklist.clone();
    blacklist.extend(location.blacklist.clone());
    blacklist
}

/// Expand tilde (~) in path
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
