//! Blacklist (exclusion) patterns
//!
//! Patterns are shell-style globs evaluated against paths relative to the
//! backup source folder, so `logs/*.log` only matches directly inside `logs/`
//! and `*.log` only matches at the top level. Use `**` to cross directories.

use crate::error::{BackupError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::fmt;

/// A compiled path pattern
pub trait PathMatcher: Send + Sync {
    /// Check a '/'-separated path relative to the backup source folder
    fn matches(&self, relative_path: &str) -> bool;
}

/// `PathMatcher` backed by globset
pub struct GlobPathMatcher {
    matcher: GlobMatcher,
}

impl PathMatcher for GlobPathMatcher {
    fn matches(&self, relative_path: &str) -> bool {
        self.matcher.is_match(relative_path)
    }
}

/// Compile a glob pattern into a matcher
pub fn compile(pattern: &str) -> Result<Box<dyn PathMatcher>> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| BackupError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })?;

    Ok(Box::new(GlobPathMatcher {
        matcher: glob.compile_matcher(),
    }))
}

/// A blacklist pattern together with the number of files it excluded
pub struct ExclusionEntry {
    pattern: String,
    matcher: Box<dyn PathMatcher>,
    match_count: usize,
}

impl ExclusionEntry {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: compile(pattern)?,
            match_count: 0,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.matcher.matches(relative_path)
    }
}

impl fmt::Debug for ExclusionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionEntry")
            .field("pattern", &self.pattern)
            .field("match_count", &self.match_count)
            .finish()
    }
}

/// The blacklist for one backup run
#[derive(Debug, Default)]
pub struct ExclusionList {
    entries: Vec<ExclusionEntry>,
}

impl ExclusionList {
    /// Compile every pattern; the first invalid one fails the whole list
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let entries = patterns
            .iter()
            .map(|p| ExclusionEntry::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Record a hit on the first pattern matching `relative_path`
    ///
    /// Returns the matching pattern, or `None` if the path is not blacklisted.
    pub fn first_match(&mut self, relative_path: &str) -> Option<&str> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.matches(relative_path))?;
        entry.match_count += 1;
        Some(entry.pattern.as_str())
    }

    pub fn entries(&self) -> &[ExclusionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ExclusionEntry> {
        self.entries
    }
}
