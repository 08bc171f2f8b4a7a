use tracing::{info, warn};

use crate::shutdown::ShutdownSender;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Resolves with the name of the first stop signal the process receives.
#[cfg(unix)]
async fn stop_signal() -> &'static str {
    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(err) => {
            warn!("SIGTERM unavailable, listening for Ctrl+C only: {}", err);
            return ctrl_c_signal().await;
        }
    };
    tokio::select! {
        name = ctrl_c_signal() => name,
        _ = term.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn stop_signal() -> &'static str {
    ctrl_c_signal().await
}

async fn ctrl_c_signal() -> &'static str {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Ctrl+C listener failed: {}", err);
        std::future::pending::<()>().await;
    }
    "Ctrl+C"
}

/// Fires shutdown on Ctrl+C or SIGTERM; exits quietly once the run stops for another reason.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut run_stopped = shutdown_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            _ = run_stopped.recv() => {}
            name = stop_signal() => {
                info!("{} received; stopping workers.", name);
                drop(shutdown_tx.send(()));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::shutdown_channel;
    use std::future::Future;
    use std::time::Duration;

    const SHUTDOWN_HANDLER_TIMEOUT: Duration = Duration::from_secs(1);

    fn run_async_test<F>(future: F) -> Result<(), String>
    where
        F: Future<Output = Result<(), String>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(future)
    }

    #[test]
    fn signal_handler_exits_on_shutdown() -> Result<(), String> {
        run_async_test(async {
            let (shutdown_tx, _) = shutdown_channel();
            let handle = setup_signal_shutdown_handler(&shutdown_tx);

            if shutdown_tx.send(()).is_err() {
                return Err("Failed to send shutdown".to_owned());
            }

            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, handle)
                .await
                .map_err(|err| format!("Timed out waiting for signal handler: {}", err))?
                .map_err(|err| format!("Signal task join error: {}", err))?;
            Ok(())
        })
    }
}
