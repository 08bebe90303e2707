//! Test utilities for local-backup-manager
//!
//! This crate provides shared test utilities, fixtures,
//! and helper functions for testing the local-backup-manager library.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, TestContext};
//!
//! #[test]
//! fn my_test() {
//!     let ctx = TestContext::from_builder(ConfigBuilder::minimal());
//!     ctx.create_source_folder("world");
//!     let (manager, reporter) = ctx.manager();
//!     // ... test code
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod test_context;

// Re-export commonly used items
pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::{OptionAssertions, ResultAssertions, TestContext};

// Re-export types from the main crate for convenience
pub use local_backup_manager::config::{
    Config, GlobalConfig, LocationConfig, LocationTarget, ResolvedLocation,
};
pub use local_backup_manager::error::BackupError;
pub use local_backup_manager::managers::backup::{BackupManager, BackupReport};
pub use local_backup_manager::managers::retention::PruneOutcome;
pub use local_backup_manager::utils::timestamp::{TimeZoneSetting, TimestampCodec};

// Re-export the recording reporter from the main crate
pub use local_backup_manager::managers::reporter::mock::{RecordingReporter, ReportEvent};
pub use local_backup_manager::managers::reporter::BackupReporter;

/// Common test result type
pub type TestResult<T = ()> = anyhow::Result<T>;
