mod state;

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::args::TesterArgs;
use crate::shutdown::ShutdownSender;

use super::{Metrics, MetricsReport};
use state::AggregationState;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Aggregates worker metrics until every sender is gone.
///
/// Fires shutdown when the target duration elapses, then keeps draining so
/// iterations that finished during wind-down are still counted.
#[must_use]
pub fn setup_metrics_collector(
    args: &TesterArgs,
    run_start: Instant,
    shutdown_tx: &ShutdownSender,
    mut metrics_rx: mpsc::Receiver<Metrics>,
) -> JoinHandle<MetricsReport> {
    let shutdown_tx_main = shutdown_tx.clone();
    let mut shutdown_rx_inner = shutdown_tx_main.subscribe();
    let target_duration = Duration::from_secs(args.target_duration.get());
    let expected_status_code = args.expected_status_code;

    tokio::spawn(async move {
        let mut state = AggregationState::new();
        let mut progress_interval = tokio::time::interval(PROGRESS_INTERVAL);
        progress_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let shutdown_timer = tokio::time::sleep(target_duration);
        tokio::pin!(shutdown_timer);
        let mut stopping = false;

        loop {
            tokio::select! {
                () = &mut shutdown_timer, if !stopping => {
                    info!("Target duration of {}s reached.", target_duration.as_secs());
                    drop(shutdown_tx_main.send(()));
                    stopping = true;
                },
                _ = shutdown_rx_inner.recv(), if !stopping => {
                    stopping = true;
                },
                maybe_msg = metrics_rx.recv() => {
                    let Some(msg) = maybe_msg else {
                        drop(shutdown_tx_main.send(()));
                        break;
                    };
                    state.process(msg, expected_status_code);
                },
                _ = progress_interval.tick() => {
                    let elapsed = run_start.elapsed();
                    debug!(
                        elapsed_secs = elapsed.as_secs(),
                        requests = state.total_requests,
                        successful = state.successful_requests,
                        rps = state.rps(elapsed),
                        "progress"
                    );
                }
            }
        }

        MetricsReport {
            summary: state.summarize(run_start.elapsed()),
        }
    })
}
