//! Logging setup for hosts of the backup manager
//!
//! Two outputs share one subscriber:
//! - Console: INFO and above on stderr
//! - File: the configured level, rotated daily, oldest files removed past
//!   `max_files`

use crate::config::{expand_tilde, GlobalConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Prefix of every log file, followed by the date and `.log`
const LOG_FILE_PREFIX: &str = "local-backup-manager";
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_directory: PathBuf,
    /// Level for file output; the console always shows INFO
    pub log_level: Level,
    /// Daily log files kept on disk, 0 keeps all of them
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_global(&GlobalConfig::default())
    }
}

impl LoggingConfig {
    /// Create from the `[global]` section of the configuration
    pub fn from_global(global: &GlobalConfig) -> Self {
        Self {
            log_directory: expand_tilde(&global.log_directory),
            log_level: parse_level(&global.log_level),
            max_files: global.log_max_files as usize,
        }
    }
}

/// Unknown level names fall back to INFO
fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "warning" => Level::WARN,
        other => Level::from_str(other).unwrap_or(Level::INFO),
    }
}

fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender> {
    fs::create_dir_all(&config.log_directory).with_context(|| {
        format!("Failed to create log directory: {:?}", config.log_directory)
    })?;

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX);
    if config.max_files > 0 {
        builder = builder.max_log_files(config.max_files);
    }

    builder
        .build(&config.log_directory)
        .with_context(|| format!("Failed to open log file in {:?}", config.log_directory))
}

/// Install the global subscriber with console and file outputs
///
/// The returned guard flushes buffered file output when dropped, so keep it
/// alive for as long as backups run.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuard> {
    let (writer, file_guard) = tracing_appender::non_blocking(file_appender(config)?);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(level_filter(config.log_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level_filter(Level::INFO));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Console-only logging for hosts without a configuration
pub fn init_console_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// `RUST_LOG` wins over the configured level
fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},local_backup_manager={}", level, level)))
}

/// Keeps the background log writer running
pub struct LogGuard {
    _file_guard: WorkerGuard,
}
