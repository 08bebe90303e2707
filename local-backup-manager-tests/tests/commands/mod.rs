//! Manager operation tests for local-backup-manager
//!
//! These tests drive the backup manager against real temporary folders.

mod create;
