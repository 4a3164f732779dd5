//! sigstamp: batch code-signing with trusted timestamps.
//!
//! Signs many executable artifacts in one pass with a code-signing
//! certificate, skipping files that already carry a valid signature and
//! falling back across an ordered list of timestamp authorities when one
//! of them is flaky.

/// Certificate resolution and the certificate-directory capability
pub mod cert;
/// Timestamp authorities and run configuration
pub mod config;
/// Error types
pub mod error;
/// Tracing setup
pub mod logging;
/// Timestamp-retry signing
pub mod retry;
/// The per-run orchestrator
pub mod run;
/// File selection
pub mod select;
/// The signing-service capability and signature prober
pub mod service;
/// Signtool-style subprocess signing service
pub mod signtool;
/// PEM-folder certificate directory
pub mod store;
/// Deadline helpers for external calls
pub mod timeout;

pub use cert::{CertificateDirectory, SigningCertificate};
pub use config::{SignConfig, TimestampAuthority};
pub use error::{Result, SigstampError};
pub use run::{Orchestrator, RunOutcome, RunRequest};
pub use service::{SignatureStatus, SigningFailure, SigningService};
