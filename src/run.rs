//! The orchestrator: resolve a certificate once, select files once, then
//! probe and sign each file sequentially.
//!
//! Files are processed one at a time in enumeration order. The bottleneck
//! is the network-bound timestamp authority, so there is nothing to gain
//! from local parallelism and the counters stay trivially consistent.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, Instrument};

use crate::cert::{self, CertificateDirectory};
use crate::config::SignConfig;
use crate::error::{Result, SigstampError};
use crate::retry::{sign_with_timestamp, sign_without_timestamp};
use crate::select::select;
use crate::service::{has_valid_signature, SigningService};

/// Parameters for one signing run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// File or directory to process
    pub target: PathBuf,
    /// Certificate fingerprint for exact lookup
    pub thumbprint: Option<String>,
    /// Comma-separated glob list, required for a directory target
    pub pattern: Option<String>,
    /// Re-sign files that already carry a valid signature
    pub force: bool,
    /// Skip the timestamp-authority step entirely
    pub no_timestamp: bool,
}

/// Counters for one run. signed + skipped + failed equals the number of
/// selected files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Files the signing service reported as successfully signed
    pub signed: u64,
    /// Files left untouched because a valid signature was present
    pub skipped: u64,
    /// Files whose no-timestamp signing attempt failed
    pub failed: u64,
    pub elapsed: Duration,
}

impl RunOutcome {
    pub fn total(&self) -> u64 {
        self.signed + self.skipped + self.failed
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} signed, {} skipped, {} failed in {:.2?}",
            self.signed, self.skipped, self.failed, self.elapsed
        )
    }
}

/// Ties the resolver, selector, prober and signer together for one run.
pub struct Orchestrator<'a, D, S> {
    directory: &'a D,
    service: &'a S,
    config: &'a SignConfig,
}

impl<'a, D, S> Orchestrator<'a, D, S>
where
    D: CertificateDirectory,
    S: SigningService,
{
    pub fn new(directory: &'a D, service: &'a S, config: &'a SignConfig) -> Self {
        Self {
            directory,
            service,
            config,
        }
    }

    /// Execute one batch run.
    ///
    /// The certificate is resolved before file selection: a missing
    /// credential is the more common fatal condition and should
    /// short-circuit directory enumeration.
    pub async fn run(&self, request: &RunRequest) -> Result<RunOutcome> {
        let span = tracing::info_span!("run", target = %request.target.display());
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: &RunRequest) -> Result<RunOutcome> {
        let started = Instant::now();

        let cert = cert::resolve(self.directory, request.thumbprint.as_deref())?;
        info!(
            subject = %cert.subject,
            thumbprint = %cert.thumbprint,
            not_after = %cert.not_after,
            "using certificate"
        );

        let targets = select(&request.target, request.pattern.as_deref())?;
        info!(count = targets.len(), "files selected");

        let per_authority_timeout = Duration::from_secs(self.config.per_authority_timeout_seconds);
        let mut signed = 0u64;
        let mut skipped = 0u64;
        let mut failed = 0u64;

        for target in targets {
            if !request.force && has_valid_signature(self.service, &target.path).await {
                info!(file = %target.path.display(), "skipped, already signed");
                skipped += 1;
                continue;
            }

            if request.no_timestamp {
                match sign_without_timestamp(self.service, &target.path, &cert).await {
                    Ok(()) => signed += 1,
                    // Reported inside the signer; the batch continues.
                    Err(_) => failed += 1,
                }
            } else {
                match sign_with_timestamp(
                    self.service,
                    &target.path,
                    &cert,
                    &self.config.authorities,
                    per_authority_timeout,
                )
                .await
                {
                    Ok(()) => signed += 1,
                    Err(e) => {
                        // Fatal mid-batch: report what was accomplished
                        // before the abort and carry it with the error.
                        let outcome = RunOutcome {
                            signed,
                            skipped,
                            failed,
                            elapsed: started.elapsed(),
                        };
                        info!(%outcome, "run aborted");
                        return Err(SigstampError::Aborted {
                            outcome,
                            source: Box::new(e),
                        });
                    }
                }
            }
        }

        let outcome = RunOutcome {
            signed,
            skipped,
            failed,
            elapsed: started.elapsed(),
        };
        info!(%outcome, "run complete");
        Ok(outcome)
    }
}
