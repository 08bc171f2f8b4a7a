use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::{interval, sleep};
use tracing::debug;

use crate::{
    args::TesterArgs, checks::CheckCounters, metrics::Metrics, rpc::Synthesizer,
    shutdown::ShutdownSender,
};

use super::rate::build_rate_limiter;
use super::transport::Transport;
use super::workload::{RequestLimiter, WorkerContext, run_iteration};

/// Everything a worker shares with its siblings. All of it is read-only or atomic.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub synthesizer: Arc<Synthesizer>,
    pub transport: Transport,
    pub checks: Arc<CheckCounters>,
}

/// Spawns the worker pool and returns the task that owns it.
///
/// Workers are released `spawn_rate` at a time every `spawn_interval` until
/// `max_tasks` are running, then loop until shutdown or the request limit.
pub fn setup_request_sender(
    args: &TesterArgs,
    shutdown_tx: &ShutdownSender,
    metrics_tx: &mpsc::Sender<Metrics>,
    context: RunContext,
) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let metrics_tx = metrics_tx.clone();

    let max_tasks = args.max_tasks.get();
    let spawn_rate = args.spawn_rate_per_tick.get();
    let tick_interval = args.tick_interval.get();
    let rate_limit = args.rate_limit.map(u64::from);
    let request_limiter = RequestLimiter::new(args.requests.map(u64::from)).map(Arc::new);
    let expected_status_code = args.expected_status_code;
    let wait_ongoing = args.wait_ongoing;
    let think_time = args.think_time;
    let seed = args.seed;
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut spawn_interval = interval(Duration::from_millis(tick_interval));
        let mut total_spawned: usize = 0;
        let permits = Arc::new(Semaphore::new(0));
        let (rate_limiter, rate_handle) = match build_rate_limiter(rate_limit) {
            Some((limiter, handle)) => (Some(limiter), Some(handle)),
            None => (None, None),
        };
        let mut worker_handles = Vec::with_capacity(max_tasks);

        for worker_idx in 0..max_tasks {
            let permits = Arc::clone(&permits);
            let metrics_tx = metrics_tx.clone();
            let context = context.clone();
            let rate_limiter = rate_limiter.clone();
            let request_limiter = request_limiter.clone();
            let mut rng = worker_rng(seed, worker_idx);
            let mut shutdown_rx_worker = shutdown_tx.subscribe();

            let handle = tokio::spawn(async move {
                let startup_permit_result = tokio::select! {
                    _ = shutdown_rx_worker.recv() => return,
                    permit = permits.acquire_owned() => permit,
                };
                let Ok(_startup_permit) = startup_permit_result else {
                    return;
                };
                debug!("Worker {} started", worker_idx);

                let worker = WorkerContext {
                    rate_limiter: rate_limiter.as_ref(),
                    request_limiter: request_limiter.as_ref(),
                    synthesizer: &context.synthesizer,
                    transport: &context.transport,
                    checks: &context.checks,
                    metrics_tx: &metrics_tx,
                    expected_status_code,
                    wait_ongoing,
                };
                loop {
                    if run_iteration(&mut shutdown_rx_worker, &worker, &mut rng).await {
                        break;
                    }
                    if let Some(pause) = think_time {
                        tokio::select! {
                            _ = shutdown_rx_worker.recv() => break,
                            () = sleep(pause) => {}
                        }
                    }
                }
                debug!("Worker {} stopped", worker_idx);
            });

            worker_handles.push(handle);
        }
        drop(metrics_tx);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = spawn_interval.tick() => {
                    if total_spawned >= max_tasks {
                        continue;
                    }
                    let available = max_tasks.saturating_sub(total_spawned);
                    let to_spawn = spawn_rate.min(available);
                    permits.add_permits(to_spawn);
                    total_spawned = total_spawned.saturating_add(to_spawn);
                }
            }
        }

        permits.close();

        for handle in worker_handles {
            if handle.await.is_err() {
                break;
            }
        }
        if let Some(rate_handle) = rate_handle {
            rate_handle.abort();
        }
    })
}

/// Per-worker generator. Seeded runs give each worker its own reproducible stream.
pub(super) fn worker_rng(seed: Option<u64>, worker_idx: usize) -> StdRng {
    match seed {
        Some(seed) => {
            let offset = u64::try_from(worker_idx).unwrap_or(u64::MAX);
            StdRng::seed_from_u64(seed.wrapping_add(offset))
        }
        None => StdRng::from_entropy(),
    }
}

