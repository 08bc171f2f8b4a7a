use super::export::export_json;
use super::run_local;
use super::summary::{RunSummary, compute_summary_stats, summary_lines};
use crate::args::test_support::parse_test_args;
use crate::checks::{CheckName, CheckSummary};
use crate::error::{AppError, FixtureError, ValidationError};
use crate::metrics::MetricsSummary;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tempfile::tempdir;

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

fn sample_metrics() -> MetricsSummary {
    MetricsSummary {
        duration: Duration::from_millis(2_000),
        total_requests: 8,
        successful_requests: 6,
        error_requests: 2,
        timeout_requests: 1,
        transport_errors: 0,
        non_expected_status: 1,
        high_priority_requests: 5,
        low_priority_requests: 3,
        fast_track_requests: 0,
        min_latency_ms: 3,
        max_latency_ms: 40,
        avg_latency_ms: 12,
        p50_latency_ms: 10,
        p90_latency_ms: 30,
        p99_latency_ms: 40,
        total_bytes: 320,
    }
}

fn sample_checks() -> Vec<CheckSummary> {
    vec![
        CheckSummary {
            name: CheckName::StatusIs200,
            passes: 7,
            fails: 1,
        },
        CheckSummary {
            name: CheckName::ResponseHasNoError,
            passes: 6,
            fails: 2,
        },
    ]
}

fn sample_summary() -> Result<RunSummary, String> {
    let started_at = Utc
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .single()
        .ok_or_else(|| "Invalid timestamp".to_owned())?;
    Ok(RunSummary::new(
        started_at,
        "http://localhost:8545/",
        sample_metrics(),
        sample_checks(),
    ))
}

#[test]
fn summary_stats_use_integer_math() -> Result<(), String> {
    let stats = compute_summary_stats(&sample_metrics());
    if stats.success_rate_x100 != 7_500 {
        return Err(format!("Unexpected success rate: {}", stats.success_rate_x100));
    }
    if stats.avg_rps_x100 != 400 {
        return Err(format!("Unexpected rps: {}", stats.avg_rps_x100));
    }
    let empty = compute_summary_stats(&MetricsSummary::default());
    if empty.success_rate_x100 != 0 || empty.avg_rps_x100 != 0 {
        return Err("Empty run must report zero rates".to_owned());
    }
    Ok(())
}

#[test]
fn text_summary_lists_checks() -> Result<(), String> {
    let lines = summary_lines(&sample_summary()?);
    let expected = [
        "Target: http://localhost:8545/",
        "Started: 2024-01-02T03:04:05.000Z",
        "Duration: 2.000s",
        "Successful: 6 (75.00%)",
        "Priority High/Low: 5 / 3",
        "P50/P90/P99 Latency: 10ms / 30ms / 40ms",
        "Avg RPS: 4.00",
        "  [FAIL] status_is_200: 7 passed, 1 failed",
        "  [FAIL] response_has_no_error: 6 passed, 2 failed",
    ];
    for line in expected {
        if !lines.iter().any(|candidate| candidate == line) {
            return Err(format!("Missing line '{}' in {:?}", line, lines));
        }
    }
    Ok(())
}

#[test]
fn json_summary_is_flat() -> Result<(), String> {
    let summary = sample_summary()?;
    let value = serde_json::to_value(&summary).map_err(|err| err.to_string())?;
    let checks = [
        ("/total_requests", Value::from(8)),
        ("/successful_requests", Value::from(6)),
        ("/duration_ms", Value::from(2_000)),
        ("/success_rate_x100", Value::from(7_500)),
        ("/checks/0/name", Value::from("status_is_200")),
        ("/checks/1/fails", Value::from(2)),
    ];
    for (pointer, expected) in checks {
        if value.pointer(pointer) != Some(&expected) {
            return Err(format!("{} mismatch in {}", pointer, value));
        }
    }
    if value.get("duration").is_some() {
        return Err("Raw duration must not be serialized".to_owned());
    }
    if summary.check_failures() != 3 {
        return Err(format!("Unexpected failures: {}", summary.check_failures()));
    }
    Ok(())
}

#[test]
fn export_json_writes_summary() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("summary.json");
    let path_str = path
        .to_str()
        .ok_or_else(|| "Temp path is not UTF-8".to_owned())?
        .to_owned();
    let summary = sample_summary()?;

    run_async_test(async move {
        export_json(&path_str, &summary)
            .await
            .map_err(|err| format!("export failed: {}", err))
    })?;

    let content = std::fs::read_to_string(&path).map_err(|err| err.to_string())?;
    let value: Value = serde_json::from_str(&content).map_err(|err| err.to_string())?;
    if value.get("target") != Some(&Value::from("http://localhost:8545/")) {
        return Err(format!("Unexpected export: {}", value));
    }
    Ok(())
}

#[test]
fn run_rejects_non_array_fixtures_before_sending() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("transactions.json");
    std::fs::write(&path, "{}").map_err(|err| err.to_string())?;
    let path_str = path
        .to_str()
        .ok_or_else(|| "Temp path is not UTF-8".to_owned())?;
    let args = parse_test_args([
        "bundle-loadtest",
        "--url",
        "http://127.0.0.1:9",
        "--fixtures",
        path_str,
    ])?;

    run_async_test(async move {
        match run_local(&args).await {
            Err(AppError::Fixture(FixtureError::NotArray { .. })) => Ok(()),
            other => Err(format!("Expected NotArray, got {:?}", other)),
        }
    })
}

#[test]
fn run_requires_a_url() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("transactions.json");
    std::fs::write(&path, r#"["0x01"]"#).map_err(|err| err.to_string())?;
    let path_str = path
        .to_str()
        .ok_or_else(|| "Temp path is not UTF-8".to_owned())?;
    let mut args = parse_test_args(["bundle-loadtest", "--fixtures", path_str])?;
    args.url = None;

    run_async_test(async move {
        match run_local(&args).await {
            Err(AppError::Validation(ValidationError::MissingUrl)) => Ok(()),
            other => Err(format!("Expected MissingUrl, got {:?}", other)),
        }
    })
}
