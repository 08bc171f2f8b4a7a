use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::interval;

/// Token bucket refilled to `rate` permits once per second.
pub(super) fn build_rate_limiter(rate_limit: Option<u64>) -> Option<(Arc<Semaphore>, JoinHandle<()>)> {
    let rate = rate_limit?;
    let limiter = Arc::new(Semaphore::new(0));
    let handle = spawn_fixed_rate_controller(Arc::clone(&limiter), rate);
    Some((limiter, handle))
}

fn spawn_fixed_rate_controller(limiter: Arc<Semaphore>, rate: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let rate_per_sec = usize::try_from(rate)
            .unwrap_or(usize::MAX)
            .min(Semaphore::MAX_PERMITS);
        let mut rate_tick = interval(Duration::from_secs(1));
        loop {
            rate_tick.tick().await;
            let available = limiter.available_permits();
            if available < rate_per_sec {
                limiter.add_permits(rate_per_sec.saturating_sub(available));
            }
        }
    })
}
