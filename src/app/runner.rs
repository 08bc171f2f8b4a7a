use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::{
    args::TesterArgs,
    checks::{CheckCounters, evaluate},
    error::{AppError, AppResult, ValidationError},
    fixture::FixtureSet,
    http::{self, RunContext, Transport, TransportOptions},
    metrics::{self, Metrics},
    rpc::{BundleOptions, Synthesizer},
    shutdown::shutdown_channel,
    shutdown_handlers::setup_signal_shutdown_handler,
};

use super::{export, summary};

/// Bounded so a slow collector applies back-pressure instead of growing memory.
const METRICS_CHANNEL_CAPACITY: usize = 10_000;

/// Runs one load test against a single endpoint and reports the result.
///
/// # Errors
///
/// Returns an error when startup fails (fixtures, URL, client, preflight),
/// a background task panics, the summary cannot be written, or
/// `--fail-on-check` is set and any check failed.
pub(crate) async fn run_local(args: &TesterArgs) -> AppResult<()> {
    let fixtures = FixtureSet::load(Path::new(&args.fixtures))?;
    let synthesizer = Arc::new(Synthesizer::new(fixtures, BundleOptions::from_args(args))?);
    let url = http::parse_target_url(args.url.as_deref())?;
    let client = http::build_client(args)?;
    let transport = Transport::new(
        client,
        url,
        TransportOptions {
            priority_header: args.priority_header.clone(),
            extra_headers: args.headers.clone(),
            max_response_bytes: args.max_response_bytes.get(),
        },
    )?;
    let target = transport.url().to_string();
    info!(
        "Sending {} to {} with {} workers, {} fixtures, blockNumber {}.",
        args.rpc_method,
        target,
        args.max_tasks.get(),
        synthesizer.fixtures().len(),
        synthesizer.block_number()
    );

    if args.preflight {
        preflight(args, &synthesizer, &transport).await?;
    }

    let checks = Arc::new(CheckCounters::new());
    let started_at = Utc::now();
    let (shutdown_tx, _) = shutdown_channel();
    let (metrics_tx, metrics_rx) = mpsc::channel::<Metrics>(METRICS_CHANNEL_CAPACITY);
    let run_start = Instant::now();

    let signal_shutdown_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let metrics_handle =
        metrics::setup_metrics_collector(args, run_start, &shutdown_tx, metrics_rx);
    let request_sender_handle = http::setup_request_sender(
        args,
        &shutdown_tx,
        &metrics_tx,
        RunContext {
            synthesizer,
            transport,
            checks: Arc::clone(&checks),
        },
    );
    drop(metrics_tx);

    let (signal_result, metrics_result, request_result) =
        tokio::join!(signal_shutdown_handle, metrics_handle, request_sender_handle);
    if let Err(err) = signal_result {
        warn!("Signal handler task failed: {}", err);
    }
    request_result?;
    let report = metrics_result?;

    let run_summary = summary::RunSummary::new(started_at, &target, report.summary, checks.snapshot());
    summary::print_summary(&run_summary, args.output_format)?;
    if let Some(path) = args.export_json.as_deref() {
        export::export_json(path, &run_summary).await?;
        info!("Summary written to {}", path);
    }

    let failed = run_summary.check_failures();
    if args.fail_on_check && failed > 0 {
        return Err(AppError::validation(ValidationError::ChecksFailed { failed }));
    }
    Ok(())
}

/// Sends one request before the run. Transport failures abort; failed checks only warn.
async fn preflight(
    args: &TesterArgs,
    synthesizer: &Synthesizer,
    transport: &Transport,
) -> AppResult<()> {
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let Some(generated) = synthesizer.synthesize(&mut rng) else {
        return Ok(());
    };
    let response = transport.send(&generated).await?;
    let outcome = evaluate(&response, args.expected_status_code);
    if outcome.passed() {
        info!("Preflight request succeeded (status {}).", response.status);
    } else {
        warn!(
            "Preflight request failed checks: status {}, no_error {}.",
            response.status, outcome.no_error
        );
    }
    Ok(())
}
