//! Command-line entry point for batch signing.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use sigstamp::config::SignConfig;
use sigstamp::logging;
use sigstamp::run::{Orchestrator, RunRequest};
use sigstamp::signtool::SignToolService;
use sigstamp::store::PemCertificateDirectory;

#[derive(Parser)]
#[command(name = "sigstamp")]
#[command(about = "Batch code-signing with trusted timestamps", long_about = None)]
struct Cli {
    /// File or directory to process
    file_or_path: PathBuf,

    /// Certificate fingerprint for exact lookup
    #[arg(long)]
    thumbprint: Option<String>,

    /// Comma-separated glob list; required (with a wildcard) for a
    /// directory target, e.g. "*.exe,*.dll"
    #[arg(long)]
    pattern: Option<String>,

    /// Re-sign files that already carry a valid signature
    #[arg(long)]
    force: bool,

    /// Skip the timestamp-authority step (faster, but signatures expire
    /// with the certificate)
    #[arg(long)]
    no_timestamp: bool,

    /// Directory holding the signing certificates (.pem/.crt/.cer)
    #[arg(long, default_value = "certs")]
    store_dir: PathBuf,

    /// External signtool-compatible program
    #[arg(long, default_value = "signtool")]
    signtool: PathBuf,

    /// Optional JSON config with authorities and timeouts
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON logs instead of human-readable lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_tracing_json();
    } else {
        logging::init_tracing();
    }

    let config = match &cli.config {
        Some(path) => SignConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SignConfig::default(),
    };

    let directory = PemCertificateDirectory::new(&cli.store_dir);
    let service = SignToolService::new(cli.signtool.display().to_string());
    let orchestrator = Orchestrator::new(&directory, &service, &config);

    let request = RunRequest {
        target: cli.file_or_path,
        thumbprint: cli.thumbprint,
        pattern: cli.pattern,
        force: cli.force,
        no_timestamp: cli.no_timestamp,
    };

    match orchestrator.run(&request).await {
        Ok(outcome) => {
            println!("{}", outcome);
            Ok(())
        }
        Err(e) => {
            // An aborted batch still reports the counters accumulated
            // before the abort via the error's own rendering.
            eprintln!("error: {}", e);
            std::process::exit(if e.is_fatal() { 2 } else { 1 });
        }
    }
}
