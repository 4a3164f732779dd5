//! Signing service backed by an external signtool-compatible program.
//!
//! Each operation is one subprocess invocation, spawned through tokio so
//! the retry loop's per-authority deadline genuinely bounds the call.

use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use crate::cert::SigningCertificate;
use crate::config::TimestampAuthority;
use crate::service::{SignatureStatus, SignatureStatus::*, SigningFailure, SigningService};

/// Wraps an external `signtool`-style executable.
#[derive(Debug, Clone)]
pub struct SignToolService {
    program: String,
}

impl SignToolService {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn invoke(&self, args: &[String]) -> Result<Output, SigningFailure> {
        debug!(program = %self.program, ?args, "invoking signing tool");
        Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(SigningFailure::Launch)
    }
}

/// Argument vector for one sign invocation, signtool flag vocabulary.
fn build_sign_args(
    file: &Path,
    cert: &SigningCertificate,
    authority: Option<&TimestampAuthority>,
) -> Vec<String> {
    let mut args = vec![
        "sign".to_string(),
        "/fd".to_string(),
        "sha256".to_string(),
        "/sha1".to_string(),
        cert.thumbprint.clone(),
    ];
    if let Some(a) = authority {
        args.push("/tr".to_string());
        args.push(a.url.clone());
        args.push("/td".to_string());
        args.push("sha256".to_string());
    }
    args.push(file.display().to_string());
    args
}

fn build_verify_args(file: &Path) -> Vec<String> {
    vec![
        "verify".to_string(),
        "/pa".to_string(),
        file.display().to_string(),
    ]
}

/// Map verify output to a signature status. Exit 0 means valid; anything
/// else is classified from the tool's diagnostics.
fn classify_verify_output(success: bool, combined_output: &str) -> SignatureStatus {
    if success {
        return Valid;
    }
    let lower = combined_output.to_ascii_lowercase();
    if lower.contains("no signature") || lower.contains("not signed") {
        NotSigned
    } else if lower.contains("did not verify") || lower.contains("hash") {
        HashMismatch
    } else if lower.contains("cannot be verified") || lower.contains("unsupported") {
        UnsupportedFileType
    } else if lower.contains("chain") || lower.contains("not trusted") || lower.contains("root") {
        NotTrusted
    } else {
        Unknown
    }
}

impl SigningService for SignToolService {
    async fn sign(
        &self,
        file: &Path,
        cert: &SigningCertificate,
        authority: Option<&TimestampAuthority>,
    ) -> Result<(), SigningFailure> {
        let output = self.invoke(&build_sign_args(file, cert, authority)).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(SigningFailure::Rejected {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    async fn inspect_signature_status(
        &self,
        file: &Path,
    ) -> Result<SignatureStatus, SigningFailure> {
        let output = self.invoke(&build_verify_args(file)).await?;
        let combined = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(classify_verify_output(output.status.success(), &combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::test_certificate;

    #[test]
    fn test_sign_args_with_authority() {
        let cert = test_certificate("ABCD");
        let authority = TimestampAuthority::new("http://tsa.example");
        let args = build_sign_args(Path::new("out.exe"), &cert, Some(&authority));
        assert_eq!(
            args,
            vec![
                "sign", "/fd", "sha256", "/sha1", "ABCD", "/tr", "http://tsa.example", "/td",
                "sha256", "out.exe"
            ]
        );
    }

    #[test]
    fn test_sign_args_without_authority() {
        let cert = test_certificate("ABCD");
        let args = build_sign_args(Path::new("out.exe"), &cert, None);
        assert_eq!(args, vec!["sign", "/fd", "sha256", "/sha1", "ABCD", "out.exe"]);
    }

    #[test]
    fn test_verify_classification() {
        assert_eq!(classify_verify_output(true, "anything"), Valid);
        assert_eq!(
            classify_verify_output(false, "SignTool Error: No signature found."),
            NotSigned
        );
        assert_eq!(
            classify_verify_output(false, "The digital signature of the object did not verify."),
            HashMismatch
        );
        assert_eq!(
            classify_verify_output(false, "This file format cannot be verified."),
            UnsupportedFileType
        );
        assert_eq!(
            classify_verify_output(false, "A certificate chain processed, but terminated in a root certificate which is not trusted."),
            NotTrusted
        );
        assert_eq!(classify_verify_output(false, "???"), Unknown);
    }

    #[tokio::test]
    async fn test_missing_tool_is_launch_failure() {
        let service = SignToolService::new("definitely-not-a-real-signtool");
        let cert = test_certificate("ABCD");
        let err = service.sign(Path::new("out.exe"), &cert, None).await;
        assert!(matches!(err, Err(SigningFailure::Launch(_))));
    }
}
