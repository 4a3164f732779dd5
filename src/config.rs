//! Run configuration: timestamp authorities and timing bounds.
//!
//! The authority list is static, process-wide, and read-only during a run.
//! Ordering is a performance knob, not a correctness one: any authority is
//! an acceptable substitute for any other, so historically fast and
//! reliable endpoints go first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Result, SigstampError};

/// A single RFC 3161 timestamp authority endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampAuthority {
    pub url: String,
}

impl TimestampAuthority {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl fmt::Display for TimestampAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Configuration for one signing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignConfig {
    /// Timestamp authorities, tried in order until one succeeds.
    pub authorities: Vec<TimestampAuthority>,
    /// Deadline for a single authority attempt.
    pub per_authority_timeout_seconds: u64,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            // Latency between public authorities varies by close to an
            // order of magnitude; fastest observed endpoints first.
            authorities: vec![
                TimestampAuthority::new("http://timestamp.digicert.com"),
                TimestampAuthority::new("http://timestamp.sectigo.com"),
                TimestampAuthority::new("http://timestamp.globalsign.com/tsa/r6advanced1"),
                TimestampAuthority::new("http://tsa.starfieldtech.com"),
            ],
            per_authority_timeout_seconds: 30,
        }
    }
}

impl SignConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| SigstampError::Store(format!("bad config {}: {}", path.display(), e)))
    }
}
