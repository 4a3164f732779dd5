//! The signing-service capability and the signature prober.
//!
//! The cryptographic primitive itself is an external collaborator. It is
//! abstracted behind [`SigningService`] so the orchestrator can be driven
//! by fakes in tests and by a signtool-style subprocess in production.

use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::cert::SigningCertificate;
use crate::config::TimestampAuthority;

/// Signature state reported by the signing service for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// A signature is present and verifies
    Valid,
    /// No embedded signature at all
    NotSigned,
    /// Signature present but the file hash does not match
    HashMismatch,
    /// Signature present but the chain is not trusted
    NotTrusted,
    /// The file type does not carry embedded signatures
    UnsupportedFileType,
    /// The service could not classify the state
    Unknown,
}

/// Failure from a single signing-service call.
///
/// Recoverable by design: one authority's failure advances the retry
/// loop, and a no-timestamp failure is contained to its file.
#[derive(Debug, Error)]
pub enum SigningFailure {
    /// The external tool could not be started
    #[error("failed to launch signing tool: {0}")]
    Launch(std::io::Error),

    /// The tool ran and rejected the request
    #[error("signing tool exited with {status}: {stderr}")]
    Rejected { status: i32, stderr: String },

    /// The service cannot handle this input at all
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Capability interface over the external signing primitive.
///
/// `sign` is async so a per-authority deadline can bound the call; the
/// batch itself stays sequential.
pub trait SigningService {
    /// Sign `file` with `cert`, counter-signed by `authority` when given.
    fn sign(
        &self,
        file: &Path,
        cert: &SigningCertificate,
        authority: Option<&TimestampAuthority>,
    ) -> impl std::future::Future<Output = Result<(), SigningFailure>>;

    /// Report the signature state of `file`.
    ///
    /// An unsigned file is a normal `NotSigned` result, not an error.
    fn inspect_signature_status(
        &self,
        file: &Path,
    ) -> impl std::future::Future<Output = Result<SignatureStatus, SigningFailure>>;
}

/// True only when the file carries a signature the service reports as
/// exactly `Valid`; every other state leaves the file eligible for signing.
pub async fn has_valid_signature<S: SigningService>(service: &S, file: &Path) -> bool {
    match service.inspect_signature_status(file).await {
        Ok(status) => status == SignatureStatus::Valid,
        Err(e) => {
            warn!(file = %file.display(), error = %e, "signature inspection failed, treating as unsigned");
            false
        }
    }
}
