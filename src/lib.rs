//! Local Backup Manager Library
//!
//! This library creates timestamped zip archives of local folders and keeps
//! the number of stored archives per folder bounded.

pub mod config;
pub mod error;
pub mod managers;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, resolve_all_locations, Config, ResolvedLocation};
pub use error::BackupError;
pub use managers::backup::{BackupManager, BackupReport};
pub use managers::logging::{init_console_logging, init_logging, LogGuard, LoggingConfig};
pub use managers::reporter::{BackupReporter, TracingReporter};
pub use managers::retention::{ArchiveIndex, PruneOutcome};
pub use utils::timestamp::{TimeZoneSetting, TimestampCodec};
