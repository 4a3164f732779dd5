//! Error types for sigstamp operations.
//!
//! Fatal errors abort the run before further files are touched; per-file
//! and per-authority failures are represented by [`SigningFailure`] in the
//! service module and stay contained to their scope.

use std::path::PathBuf;
use thiserror::Error;

use crate::service::SigningFailure;

/// Main error type for sigstamp operations.
#[derive(Debug, Error)]
pub enum SigstampError {
    /// No usable code-signing certificate in the directory
    #[error("no code-signing certificate found")]
    NoCertificateFound,

    /// Directory target without a usable wildcard pattern
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// The positional target path does not exist
    #[error("target not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    /// Every configured timestamp authority failed for one file
    #[error("timestamping failed after trying {attempted} authorities")]
    TimestampingExhausted { attempted: usize },

    /// A fatal per-file error stopped the batch partway through; the
    /// counters accumulated before the abort travel with the error so
    /// they can still be reported.
    #[error("run aborted after {outcome}: {source}")]
    Aborted {
        outcome: crate::run::RunOutcome,
        #[source]
        source: Box<SigstampError>,
    },

    /// A bounded operation exceeded its deadline
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Certificate store read or parse problem
    #[error("certificate store error: {0}")]
    Store(String),

    /// Signing-service failure that escaped its recoverable scope
    #[error("signing service error: {0}")]
    Service(#[from] SigningFailure),
}

/// Result type alias for sigstamp operations
pub type Result<T> = std::result::Result<T, SigstampError>;

impl SigstampError {
    /// Whether this error aborts the whole run rather than one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SigstampError::NoCertificateFound
                | SigstampError::InvalidPattern(_)
                | SigstampError::TargetNotFound(_)
                | SigstampError::TimestampingExhausted { .. }
                | SigstampError::Aborted { .. }
        )
    }
}
