use std::ffi::OsString;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_upload::config::Config;
use cv_upload::source::LocalFileSource;
use cv_upload::upload::SubmissionOrchestrator;
use cv_upload::{HttpAnalysisService, Phase, UploadSession};

const USAGE: &str = "usage: cv-upload [--endpoint URL] <file>";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cv-upload v{}", env!("CARGO_PKG_VERSION"));

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{USAGE}");
        return Ok(());
    }
    let endpoint: Option<String> = args.opt_value_from_str("--endpoint")?;
    let paths: Vec<OsString> = args.finish();
    let endpoint = endpoint.unwrap_or_else(|| config.endpoint.clone());

    let service = HttpAnalysisService::new(endpoint, config.request_timeout)
        .context("Failed to build HTTP client")?;
    info!("Analysis endpoint: {}", service.endpoint());

    let source = Arc::new(LocalFileSource);
    let mut candidates = Vec::with_capacity(paths.len());
    for path in &paths {
        let candidate = source
            .describe(path)
            .await
            .with_context(|| format!("Cannot use {}", path.to_string_lossy()))?;
        candidates.push(candidate);
    }

    let orchestrator = SubmissionOrchestrator::new(source, Arc::new(service));
    let mut session = UploadSession::new(orchestrator, config.settle_delay);

    session.files_offered(candidates);
    if let Some(message) = &session.snapshot().error_message {
        bail!("{message}");
    }

    session.submit();
    let snapshot = session.run_until_settled().await;

    match (snapshot.phase, &snapshot.analysis_result) {
        (Phase::Succeeded, Some(report)) => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
        _ => {
            if let Some(failure) = &snapshot.failure {
                error!("Submission failed: {failure}");
            }
            let message = snapshot
                .error_message
                .clone()
                .unwrap_or_else(|| format!("Upload ended in phase {}", snapshot.phase));
            bail!("{message}")
        }
    }
}
