//! Certificate resolution.
//!
//! The certificate store is an external collaborator behind the
//! [`CertificateDirectory`] capability. Resolution runs exactly once per
//! run and the resolved handle is read-only for the rest of the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SigstampError};

/// Opaque handle to a code-signing credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningCertificate {
    /// Unique hash-derived identifier, uppercase hex
    pub thumbprint: String,
    pub subject: String,
    pub issuer: String,
    pub not_after: DateTime<Utc>,
    /// Where the certificate came from (store path or provider name)
    pub store_location: String,
}

/// Read-only query capability over a certificate store.
pub trait CertificateDirectory {
    /// All certificates whose fingerprint matches exactly.
    fn find_by_thumbprint(&self, thumbprint: &str) -> Result<Vec<SigningCertificate>>;

    /// All certificates flagged as code-signing capable, in directory
    /// enumeration order.
    fn find_code_signing_capable(&self) -> Result<Vec<SigningCertificate>>;
}

/// Resolve the certificate for this run.
///
/// A failed targeted lookup degrades to "pick any code-signing-capable
/// certificate" rather than failing immediately; only an empty store on
/// both paths is fatal.
pub fn resolve<D: CertificateDirectory>(
    directory: &D,
    thumbprint: Option<&str>,
) -> Result<SigningCertificate> {
    if let Some(print) = thumbprint {
        match directory.find_by_thumbprint(print) {
            Ok(matches) => {
                if let Some(cert) = matches.into_iter().next() {
                    debug!(thumbprint = %print, subject = %cert.subject, "resolved by thumbprint");
                    return Ok(cert);
                }
                warn!(thumbprint = %print, "no certificate with that thumbprint, falling back to any code-signing certificate");
            }
            Err(e) => {
                warn!(thumbprint = %print, error = %e, "thumbprint lookup failed, falling back to any code-signing certificate");
            }
        }
    }

    let capable = directory.find_code_signing_capable()?;
    match capable.into_iter().next() {
        Some(cert) => {
            debug!(thumbprint = %cert.thumbprint, subject = %cert.subject, "resolved first code-signing certificate");
            if cert.not_after < Utc::now() {
                warn!(subject = %cert.subject, not_after = %cert.not_after, "certificate is expired");
            }
            Ok(cert)
        }
        None => Err(SigstampError::NoCertificateFound),
    }
}

#[cfg(test)]
pub(crate) fn test_certificate(thumbprint: &str) -> SigningCertificate {
    SigningCertificate {
        thumbprint: thumbprint.to_string(),
        subject: "CN=Test Publisher".to_string(),
        issuer: "CN=Test CA".to_string(),
        not_after: Utc::now() + chrono::Duration::days(365),
        store_location: "test".to_string(),
    }
}
