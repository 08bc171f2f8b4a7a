use super::*;
use crate::args::test_support::parse_test_args;
use crate::checks::CheckOutcome;
use crate::rpc::Priority;
use std::future::Future;
use std::time::Duration;
use crate::shutdown::shutdown_channel;
use tokio::sync::mpsc;
use tokio::time::Instant;

const PASSED: CheckOutcome = CheckOutcome {
    status_ok: true,
    no_error: true,
};

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

fn metric(latency_ms: u64, status_code: u16, checks: CheckOutcome, priority: Priority) -> Metrics {
    Metrics {
        response_time: Duration::from_millis(latency_ms),
        status_code,
        timed_out: false,
        transport_error: false,
        checks,
        priority,
        fast_track: false,
        response_bytes: 40,
    }
}

#[test]
fn histogram_reports_percentiles() -> Result<(), String> {
    let mut histogram = LatencyHistogram::new().map_err(|err| err.to_string())?;
    if histogram.percentiles() != LatencyPercentiles::default() {
        return Err("Empty histogram must report zeros".to_owned());
    }
    for value in 1..=100_u64 {
        histogram.record(value);
    }
    let LatencyPercentiles { p50, p90, p99 } = histogram.percentiles();
    if !(49..=51).contains(&p50) || !(89..=91).contains(&p90) || !(98..=100).contains(&p99) {
        return Err(format!("Unexpected percentiles: {} {} {}", p50, p90, p99));
    }
    Ok(())
}

#[test]
fn histogram_clamps_out_of_range_latency() -> Result<(), String> {
    let mut histogram = LatencyHistogram::new().map_err(|err| err.to_string())?;
    histogram.record(0);
    if histogram.percentiles().p50 != 1 {
        return Err("Zero latency must be recorded as 1 ms".to_owned());
    }
    histogram.record(u64::MAX);
    if histogram.percentiles().p99 < 3_600_000 {
        return Err("Oversized latency must land in the top bucket".to_owned());
    }
    Ok(())
}

#[test]
fn collector_aggregates_until_senders_close() -> Result<(), String> {
    run_async_test(async {
        let args = parse_test_args(["bundle-loadtest", "--url", "http://localhost", "-t", "60"])?;
        let (shutdown_tx, _) = shutdown_channel();
        let (metrics_tx, metrics_rx) = mpsc::channel::<Metrics>(16);

        let handle = setup_metrics_collector(&args, Instant::now(), &shutdown_tx, metrics_rx);

        let rpc_error = CheckOutcome {
            status_ok: true,
            no_error: false,
        };
        let mut fast = metric(30, 200, PASSED, Priority::High);
        fast.fast_track = true;
        let mut timed_out = metric(50, 0, CheckOutcome::FAILED, Priority::High);
        timed_out.timed_out = true;
        timed_out.response_bytes = 0;
        let mut refused = metric(1, 0, CheckOutcome::FAILED, Priority::Low);
        refused.transport_error = true;
        refused.response_bytes = 0;

        for msg in [
            metric(10, 200, PASSED, Priority::Low),
            metric(20, 200, rpc_error, Priority::Low),
            fast,
            metric(40, 503, CheckOutcome::FAILED, Priority::Low),
            timed_out,
            refused,
        ] {
            metrics_tx
                .send(msg)
                .await
                .map_err(|err| format!("send failed: {}", err))?;
        }
        drop(metrics_tx);

        let report = handle
            .await
            .map_err(|err| format!("collector join failed: {}", err))?;
        let summary = report.summary;
        let expected = [
            ("total", summary.total_requests, 6),
            ("successful", summary.successful_requests, 2),
            ("errors", summary.error_requests, 4),
            ("timeouts", summary.timeout_requests, 1),
            ("transport", summary.transport_errors, 1),
            ("non_expected", summary.non_expected_status, 1),
            ("high", summary.high_priority_requests, 2),
            ("low", summary.low_priority_requests, 4),
            ("fast_track", summary.fast_track_requests, 1),
            ("min", summary.min_latency_ms, 1),
            ("max", summary.max_latency_ms, 50),
            ("avg", summary.avg_latency_ms, 25),
            ("bytes", summary.total_bytes, 160),
        ];
        for (name, actual, wanted) in expected {
            if actual != wanted {
                return Err(format!("{}: expected {}, got {}", name, wanted, actual));
            }
        }
        Ok(())
    })
}

#[test]
fn collector_fires_shutdown_after_target_duration() -> Result<(), String> {
    run_async_test(async {
        let args = parse_test_args(["bundle-loadtest", "--url", "http://localhost", "-t", "1"])?;
        let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
        let (metrics_tx, metrics_rx) = mpsc::channel::<Metrics>(4);

        let handle = setup_metrics_collector(&args, Instant::now(), &shutdown_tx, metrics_rx);

        tokio::time::timeout(Duration::from_secs(5), shutdown_rx.recv())
            .await
            .map_err(|_elapsed| "Collector never fired shutdown".to_owned())?
            .map_err(|err| format!("shutdown recv failed: {}", err))?;

        metrics_tx
            .send(metric(5, 200, PASSED, Priority::High))
            .await
            .map_err(|err| format!("send after shutdown failed: {}", err))?;
        drop(metrics_tx);

        let report = handle
            .await
            .map_err(|err| format!("collector join failed: {}", err))?;
        if report.summary.total_requests != 1 {
            return Err("Metrics sent during wind-down must be counted".to_owned());
        }
        if report.summary.duration < Duration::from_secs(1) {
            return Err("Duration must cover the run".to_owned());
        }
        Ok(())
    })
}

#[test]
fn empty_run_reports_zeros() -> Result<(), String> {
    run_async_test(async {
        let args = parse_test_args(["bundle-loadtest", "--url", "http://localhost"])?;
        let (shutdown_tx, _) = shutdown_channel();
        let (metrics_tx, metrics_rx) = mpsc::channel::<Metrics>(1);
        let handle = setup_metrics_collector(&args, Instant::now(), &shutdown_tx, metrics_rx);
        drop(metrics_tx);

        let summary = handle
            .await
            .map_err(|err| format!("collector join failed: {}", err))?
            .summary;
        if summary.total_requests != 0 || summary.min_latency_ms != 0 || summary.avg_latency_ms != 0
        {
            return Err(format!("Expected zeroed summary, got {:?}", summary));
        }
        Ok(())
    })
}
