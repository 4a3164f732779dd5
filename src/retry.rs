//! Timestamp-retry signing.
//!
//! One flaky authority must not block a whole batch: authorities are
//! tried in configured order, each attempt bounded by a deadline, and the
//! first success wins. Failure handling is explicit result branching so
//! the control flow reads exactly as it behaves.

use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::cert::SigningCertificate;
use crate::config::TimestampAuthority;
use crate::error::{Result, SigstampError};
use crate::service::{SigningFailure, SigningService};
use crate::timeout::{with_timeout, TimeoutConfig};

/// Sign `file`, counter-signing with the first authority that answers.
///
/// Authorities are tried strictly in order; remaining entries are not
/// touched after a success. If every authority fails (rejection, network
/// error, or deadline), the whole run is considered unable to timestamp
/// and `TimestampingExhausted` is returned.
pub async fn sign_with_timestamp<S: SigningService>(
    service: &S,
    file: &Path,
    cert: &SigningCertificate,
    authorities: &[TimestampAuthority],
    per_authority_timeout: Duration,
) -> Result<()> {
    let mut attempted = 0usize;
    for authority in authorities {
        attempted += 1;
        let config = TimeoutConfig {
            duration: per_authority_timeout,
            operation_name: format!("sign {} via {}", file.display(), authority),
        };
        let attempt = with_timeout(config, async {
            service
                .sign(file, cert, Some(authority))
                .await
                .map_err(SigstampError::from)
        })
        .await;

        match attempt {
            Ok(()) => {
                info!(file = %file.display(), authority = %authority, "signed");
                return Ok(());
            }
            Err(e) => {
                warn!(
                    file = %file.display(),
                    authority = %authority,
                    error = %e,
                    "timestamp authority attempt failed, trying next"
                );
            }
        }
    }
    Err(SigstampError::TimestampingExhausted { attempted })
}

/// Sign `file` without a trusted timestamp.
///
/// The signature will expire with the certificate. A failure here is
/// per-file recoverable: it is reported and the caller moves on to the
/// next file.
pub async fn sign_without_timestamp<S: SigningService>(
    service: &S,
    file: &Path,
    cert: &SigningCertificate,
) -> std::result::Result<(), SigningFailure> {
    match service.sign(file, cert, None).await {
        Ok(()) => {
            info!(file = %file.display(), "signed (no timestamp)");
            Ok(())
        }
        Err(e) => {
            error!(file = %file.display(), error = %e, "signing failed");
            Err(e)
        }
    }
}
