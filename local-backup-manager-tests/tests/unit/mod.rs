//! Unit tests for local-backup-manager
//!
//! These tests exercise configuration, path safety and archive naming in isolation.

mod config;
mod paths;
mod timestamp;
