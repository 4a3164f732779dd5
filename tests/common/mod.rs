//! Shared fakes for integration tests.

use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use sigstamp::cert::{CertificateDirectory, SigningCertificate};
use sigstamp::config::TimestampAuthority;
use sigstamp::error::Result;
use sigstamp::service::{SignatureStatus, SigningFailure, SigningService};

pub fn certificate(thumbprint: &str) -> SigningCertificate {
    SigningCertificate {
        thumbprint: thumbprint.to_string(),
        subject: "CN=Integration Publisher".to_string(),
        issuer: "CN=Integration CA".to_string(),
        not_after: Utc::now() + chrono::Duration::days(90),
        store_location: "fake".to_string(),
    }
}

pub struct FakeDirectory {
    pub certs: Vec<SigningCertificate>,
}

impl CertificateDirectory for FakeDirectory {
    fn find_by_thumbprint(&self, thumbprint: &str) -> Result<Vec<SigningCertificate>> {
        Ok(self
            .certs
            .iter()
            .filter(|c| c.thumbprint.eq_ignore_ascii_case(thumbprint))
            .cloned()
            .collect())
    }

    fn find_code_signing_capable(&self) -> Result<Vec<SigningCertificate>> {
        Ok(self.certs.clone())
    }
}

/// Fake signing service that appends a marker to signed files, so tests
/// can check which files were touched and which were left byte-identical.
pub struct RecordingService {
    /// Bare file names reported as already validly signed
    pub valid: HashSet<String>,
    /// Authority URLs that always fail
    pub failing_authorities: HashSet<String>,
    /// Authorities used for each sign call, in order
    pub authority_calls: Mutex<Vec<Option<String>>>,
}

pub const SIGNATURE_MARKER: &[u8] = b"+SIGNED";

impl RecordingService {
    pub fn new() -> Self {
        Self {
            valid: HashSet::new(),
            failing_authorities: HashSet::new(),
            authority_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn authority_calls(&self) -> Vec<Option<String>> {
        self.authority_calls.lock().unwrap().clone()
    }
}

fn name_of(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

impl SigningService for RecordingService {
    async fn sign(
        &self,
        file: &Path,
        _cert: &SigningCertificate,
        authority: Option<&TimestampAuthority>,
    ) -> std::result::Result<(), SigningFailure> {
        let url = authority.map(|a| a.url.clone());
        self.authority_calls.lock().unwrap().push(url.clone());
        if let Some(u) = &url {
            if self.failing_authorities.contains(u) {
                return Err(SigningFailure::Rejected {
                    status: 1,
                    stderr: format!("{} unavailable", u),
                });
            }
        }
        let mut data = std::fs::read(file).map_err(SigningFailure::Launch)?;
        data.extend_from_slice(SIGNATURE_MARKER);
        std::fs::write(file, data).map_err(SigningFailure::Launch)?;
        Ok(())
    }

    async fn inspect_signature_status(
        &self,
        file: &Path,
    ) -> std::result::Result<SignatureStatus, SigningFailure> {
        if self.valid.contains(&name_of(file)) {
            Ok(SignatureStatus::Valid)
        } else {
            Ok(SignatureStatus::NotSigned)
        }
    }
}
