use super::types::*;
use crate::utils::archive::MAX_COMPRESSION_LEVEL;
use crate::utils::paths::validate_location;
use crate::utils::timestamp::{TimeZoneSetting, TimestampCodec};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate the configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let global = &config.global;

    if global.zip_compression > MAX_COMPRESSION_LEVEL {
        return Err(ConfigError::ValidationError(format!(
            "zip_compression must be between 0 and {}, got {}",
            MAX_COMPRESSION_LEVEL, global.zip_compression
        )));
    }

    validate_keep_count("global", global.keep_count)?;

    let zone = parse_time_zone(&global.time_zone)?;
    validate_format("global", &global.file_name_format, zone)?;

    for (index, location) in config.locations.iter().enumerate() {
        validate_location_config(index, location, zone)?;
    }

    Ok(())
}

fn validate_location_config(
    index: usize,
    location: &LocationConfig,
    zone: TimeZoneSetting,
) -> Result<()> {
    let label = format!("locations[{}]", index);

    match (&location.path, &location.glob) {
        (Some(path), None) => {
            validate_location(path)
                .map_err(|e| ConfigError::ValidationError(format!("{}: {}", label, e)))?;
        }
        (None, Some(glob)) => {
            if glob.starts_with('/') || Path::new(glob).has_root() {
                return Err(ConfigError::ValidationError(format!(
                    "{}: glob must be relative: {}",
                    label, glob
                )));
            }
        }
        (Some(_), Some(_)) => {
            return Err(ConfigError::ValidationError(format!(
                "{}: set either 'path' or 'glob', not both",
                label
            )));
        }
        (None, None) => {
            return Err(ConfigError::ValidationError(format!(
                "{}: one of 'path' or 'glob' is required",
                label
            )));
        }
    }

    if let Some(keep_count) = location.keep_count {
        validate_keep_count(&label, keep_count)?;
    }

    if let Some(ref format) = location.format {
        validate_format(&label, format, zone)?;
    }

    Ok(())
}

fn validate_keep_count(label: &str, keep_count: i64) -> Result<()> {
    if keep_count < -1 {
        return Err(ConfigError::ValidationError(format!(
            "{}: keep_count must be -1 (keep all) or at least 0, got {}",
            label, keep_count
        )));
    }
    Ok(())
}

fn validate_format(label: &str, format: &str, zone: TimeZoneSetting) -> Result<()> {
    TimestampCodec::new(format, zone)
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError(format!("{}: {}", label, e)))
}

/// Parse the configured time zone
pub fn parse_time_zone(value: &str) -> Result<TimeZoneSetting> {
    value
        .parse::<TimeZoneSetting>()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))
}

/// Resolve a location by merging it with global defaults
pub fn resolve_location(location: &LocationConfig, global: &GlobalConfig) -> Result<ResolvedLocation> {
    let target = match (&location.path, &location.glob) {
        (Some(path), None) => LocationTarget::Path(path.clone()),
        (None, Some(glob)) => LocationTarget::Glob(glob.clone()),
        _ => {
            return Err(ConfigError::ValidationError(
                "Location must set exactly one of 'path' or 'glob'".to_string(),
            ))
        }
    };

    let format = location
        .format
        .clone()
        .unwrap_or_else(|| global.file_name_format.clone());

    let keep_count = location.keep_count.unwrap_or(global.keep_count);

    Ok(ResolvedLocation {
        target,
        format,
        create: location.create,
        keep_count,
        blacklist: super::get_effective_blacklist(location, global),
    })
}

/// Resolve all locations in the configuration
pub fn resolve_all_locations(config: &Config) -> Result<Vec<ResolvedLocation>> {
    config
        .locations
        .iter()
        .map(|location| resolve_location(location, &config.global))
        .collect()
}
