use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use rand::rngs::StdRng;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::{
    checks::{CheckCounters, CheckOutcome, evaluate},
    metrics::Metrics,
    rpc::Synthesizer,
    shutdown::ShutdownReceiver,
};

use super::transport::Transport;

/// Target for the per-iteration diagnostic line.
pub(crate) const ITERATION_TARGET: &str = "bundle_loadtest::iteration";

/// Caps the total number of requests across all workers.
#[derive(Debug)]
pub(super) struct RequestLimiter {
    limit: u64,
    counter: AtomicU64,
}

impl RequestLimiter {
    pub(super) fn new(limit: Option<u64>) -> Option<Self> {
        limit.map(|limit| RequestLimiter {
            limit,
            counter: AtomicU64::new(0),
        })
    }

    /// Reserves one request slot.
    ///
    /// A refusal stops only the calling worker. In-flight requests of its
    /// siblings still complete; the run ends when the last worker drops its
    /// metrics sender.
    pub(super) fn try_reserve(&self) -> bool {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            if current >= self.limit {
                return false;
            }
            let Some(next) = current.checked_add(1) else {
                return false;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
    }
}

pub(super) struct WorkerContext<'ctx> {
    pub(super) rate_limiter: Option<&'ctx Arc<Semaphore>>,
    pub(super) request_limiter: Option<&'ctx Arc<RequestLimiter>>,
    pub(super) synthesizer: &'ctx Synthesizer,
    pub(super) transport: &'ctx Transport,
    pub(super) checks: &'ctx CheckCounters,
    pub(super) metrics_tx: &'ctx mpsc::Sender<Metrics>,
    pub(super) expected_status_code: u16,
    pub(super) wait_ongoing: bool,
}

/// Returns `false` when the iteration must not run. A lagged receiver counts as stopped.
async fn prepare_iteration(shutdown_rx: &mut ShutdownReceiver, worker: &WorkerContext<'_>) -> bool {
    if worker.wait_ongoing && !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty)) {
        return false;
    }
    if let Some(request_limiter) = worker.request_limiter
        && !request_limiter.try_reserve()
    {
        debug!("Request limit reached; worker stopping.");
        return false;
    }
    if let Some(rate_limiter) = worker.rate_limiter {
        let denied = tokio::select! {
            _ = shutdown_rx.recv() => true,
            permit = rate_limiter.acquire() => match permit {
                Ok(permit) => {
                    permit.forget();
                    false
                }
                Err(_closed) => true,
            },
        };
        if denied {
            return false;
        }
    }
    true
}

/// One synthesize -> send -> check -> record pass. Returns `true` when the
/// worker should stop.
pub(super) async fn run_iteration(
    shutdown_rx: &mut ShutdownReceiver,
    worker: &WorkerContext<'_>,
    rng: &mut StdRng,
) -> bool {
    if !prepare_iteration(shutdown_rx, worker).await {
        return true;
    }

    let Some(generated) = worker.synthesizer.synthesize(rng) else {
        error!("Fixture set is empty; stopping worker.");
        return true;
    };
    info!(
        target: ITERATION_TARGET,
        index = generated.index,
        priority = %generated.priority,
        fast_track = generated.fast_track,
        "req tx"
    );

    let start = Instant::now();
    let result = if worker.wait_ongoing {
        worker.transport.send(&generated).await
    } else {
        tokio::select! {
            _ = shutdown_rx.recv() => return true,
            result = worker.transport.send(&generated) => result,
        }
    };

    let (outcome, status_code, timed_out, transport_error, response_bytes) = match result {
        Ok(response) => (
            evaluate(&response, worker.expected_status_code),
            response.status,
            false,
            false,
            u64::try_from(response.body.len()).unwrap_or(u64::MAX),
        ),
        Err(err) => {
            warn!("Request failed: {}", err);
            let timed_out = err.is_timeout();
            (CheckOutcome::FAILED, 0, timed_out, !timed_out, 0)
        }
    };
    worker.checks.record(outcome);

    let metric = Metrics {
        response_time: start.elapsed(),
        status_code,
        timed_out,
        transport_error,
        checks: outcome,
        priority: generated.priority,
        fast_track: generated.fast_track,
        response_bytes,
    };
    worker.metrics_tx.send(metric).await.is_err()
}
