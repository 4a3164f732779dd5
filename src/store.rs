//! Filesystem-backed certificate directory.
//!
//! Scans a directory of PEM or DER encoded certificates and exposes them
//! through the [`CertificateDirectory`] capability. The thumbprint is the
//! uppercase SHA-256 hex of the DER encoding; a certificate counts as
//! code-signing capable when its Extended Key Usage lists id-kp-codeSigning.

use chrono::{DateTime, Utc};
use der::asn1::ObjectIdentifier;
use der::{Decode, DecodePem, Encode};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;
use x509_cert::ext::pkix::ExtendedKeyUsage;
use x509_cert::Certificate;

use crate::cert::{CertificateDirectory, SigningCertificate};
use crate::error::{Result, SigstampError};

const EXTENDED_KEY_USAGE_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.37");
const CODE_SIGNING_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.3");

/// Certificate directory backed by a folder of `.pem`/`.crt`/`.cer` files.
#[derive(Debug, Clone)]
pub struct PemCertificateDirectory {
    root: PathBuf,
}

struct LoadedCert {
    cert: SigningCertificate,
    code_signing: bool,
}

impl PemCertificateDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Enumerate and parse every certificate file, directory order.
    /// Unparseable files are skipped, not errors.
    fn scan(&self) -> Result<Vec<LoadedCert>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            SigstampError::Store(format!("cannot read {}: {}", self.root.display(), e))
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| SigstampError::Store(format!("directory entry error: {}", e)))?;
            let path = entry.path();
            if !is_certificate_file(&path) {
                continue;
            }
            let data = match std::fs::read(&path) {
                Ok(d) => d,
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            match parse_certificate(&data, &path) {
                Some(c) => loaded.push(c),
                None => debug!(file = %path.display(), "skipping non-certificate file"),
            }
        }
        Ok(loaded)
    }
}

fn is_certificate_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("pem") | Some("crt") | Some("cer")
    )
}

/// PEM first, raw DER as fallback.
fn parse_certificate(data: &[u8], path: &Path) -> Option<LoadedCert> {
    let cert = Certificate::from_pem(data)
        .or_else(|_| Certificate::from_der(data))
        .ok()?;

    let der = cert.to_der().ok()?;
    let thumbprint = hex::encode_upper(Sha256::digest(&der));

    let not_after: DateTime<Utc> = cert
        .tbs_certificate
        .validity
        .not_after
        .to_system_time()
        .into();

    let code_signing = has_code_signing_eku(&cert);

    Some(LoadedCert {
        cert: SigningCertificate {
            thumbprint,
            subject: cert.tbs_certificate.subject.to_string(),
            issuer: cert.tbs_certificate.issuer.to_string(),
            not_after,
            store_location: path.display().to_string(),
        },
        code_signing,
    })
}

fn has_code_signing_eku(cert: &Certificate) -> bool {
    let Some(extensions) = &cert.tbs_certificate.extensions else {
        return false;
    };
    for ext in extensions {
        if ext.extn_id != EXTENDED_KEY_USAGE_OID {
            continue;
        }
        if let Ok(eku) = ExtendedKeyUsage::from_der(ext.extn_value.as_bytes()) {
            return eku.0.contains(&CODE_SIGNING_OID);
        }
    }
    false
}

impl CertificateDirectory for PemCertificateDirectory {
    fn find_by_thumbprint(&self, thumbprint: &str) -> Result<Vec<SigningCertificate>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|c| c.cert.thumbprint.eq_ignore_ascii_case(thumbprint))
            .map(|c| c.cert)
            .collect())
    }

    fn find_code_signing_capable(&self) -> Result<Vec<SigningCertificate>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|c| c.code_signing)
            .map(|c| c.cert)
            .collect())
    }
}
