//! File selection: expand a path plus optional pattern into the set of
//! files to process.
//!
//! A single-file target is taken as-is. A directory target requires a
//! comma-separated glob list with at least one wildcard; matching is
//! case-insensitive against file names only.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SigstampError};

/// What kind of filesystem entry the target path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    NotFound,
}

/// Probe the target path once and dispatch on the result.
pub fn probe_path(path: &Path) -> PathKind {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        Ok(_) => PathKind::File,
        Err(_) => PathKind::NotFound,
    }
}

/// One file to be signed. Produced per run, consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub path: PathBuf,
    pub absolute: PathBuf,
}

impl FileTarget {
    pub fn new(path: PathBuf) -> Self {
        let absolute = path.canonicalize().unwrap_or_else(|_| path.clone());
        Self { path, absolute }
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A comma-separated list of glob alternatives, each applied as an OR.
#[derive(Debug, Clone)]
pub struct NamePattern {
    alternatives: Vec<Pattern>,
}

impl NamePattern {
    /// Parse and validate a pattern list.
    ///
    /// At least one alternative must contain `*` or `?`; a pattern with
    /// no wildcard at all would silently select nothing or exactly one
    /// name, which is always a caller mistake in directory mode.
    pub fn parse(raw: &str) -> Result<Self> {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if entries.is_empty() {
            return Err(SigstampError::InvalidPattern(raw.to_string()));
        }
        if !entries
            .iter()
            .any(|e| e.contains('*') || e.contains('?'))
        {
            return Err(SigstampError::InvalidPattern(format!(
                "{} (no wildcard in any entry)",
                raw
            )));
        }
        let mut alternatives = Vec::with_capacity(entries.len());
        for entry in entries {
            let pattern = Pattern::new(entry)
                .map_err(|e| SigstampError::InvalidPattern(format!("{}: {}", entry, e)))?;
            alternatives.push(pattern);
        }
        Ok(Self { alternatives })
    }

    /// Case-insensitive match of a bare file name against any alternative.
    pub fn matches(&self, file_name: &str) -> bool {
        self.alternatives
            .iter()
            .any(|p| p.matches_with(file_name, GLOB_OPTIONS))
    }
}

/// Expand `target` into the concrete files to process.
///
/// Directory enumeration order; finite; one-shot per run.
pub fn select(target: &Path, pattern: Option<&str>) -> Result<Vec<FileTarget>> {
    match probe_path(target) {
        PathKind::File => Ok(vec![FileTarget::new(target.to_path_buf())]),
        PathKind::Directory => {
            let raw = pattern.ok_or_else(|| {
                SigstampError::InvalidPattern("pattern is required for a directory target".into())
            })?;
            // Validate before touching the tree.
            let pattern = NamePattern::parse(raw)?;
            let mut targets = Vec::new();
            for entry in WalkDir::new(target) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(target = %target.display(), error = %e, "skipping unreadable entry");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy();
                if pattern.matches(&name) {
                    targets.push(FileTarget::new(entry.path().to_path_buf()));
                }
            }
            debug!(target = %target.display(), count = targets.len(), "selected files");
            Ok(targets)
        }
        PathKind::NotFound => Err(SigstampError::TargetNotFound(target.to_path_buf())),
    }
}
