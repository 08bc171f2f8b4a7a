use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::args::OutputFormat;
use crate::checks::CheckSummary;
use crate::error::AppResult;
use crate::metrics::MetricsSummary;

/// Two fixed decimals for integer-scaled percentages and rates.
const PERCENT_DIVISOR: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct SummaryStats {
    pub(crate) success_rate_x100: u64,
    pub(crate) avg_rps_x100: u64,
}

pub(crate) fn compute_summary_stats(summary: &MetricsSummary) -> SummaryStats {
    let duration_ms = summary.duration.as_millis().max(1);
    let total = summary.total_requests;
    let success = summary.successful_requests;

    let success_rate_x100 = if total > 0 {
        let scaled = u128::from(success)
            .saturating_mul(10_000)
            .checked_div(u128::from(total))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    let avg_rps_x100 = if total > 0 {
        let scaled = u128::from(total)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    } else {
        0
    };

    SummaryStats {
        success_rate_x100,
        avg_rps_x100,
    }
}

/// Final report of one run, printed as text or JSON and optionally exported.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) started_at: String,
    pub(crate) target: String,
    pub(crate) duration_ms: u64,
    #[serde(flatten)]
    pub(crate) metrics: MetricsSummary,
    #[serde(flatten)]
    pub(crate) stats: SummaryStats,
    pub(crate) checks: Vec<CheckSummary>,
}

impl RunSummary {
    pub(crate) fn new(
        started_at: DateTime<Utc>,
        target: &str,
        metrics: MetricsSummary,
        checks: Vec<CheckSummary>,
    ) -> Self {
        let stats = compute_summary_stats(&metrics);
        Self {
            started_at: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            target: target.to_owned(),
            duration_ms: u64::try_from(metrics.duration.as_millis()).unwrap_or(u64::MAX),
            metrics,
            stats,
            checks,
        }
    }

    pub(crate) fn check_failures(&self) -> u64 {
        self.checks
            .iter()
            .fold(0_u64, |acc, check| acc.saturating_add(check.fails))
    }
}

pub(crate) fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let metrics = &summary.metrics;
    let stats = &summary.stats;
    let mut lines = Vec::new();

    lines.push(format!("Target: {}", summary.target));
    lines.push(format!("Started: {}", summary.started_at));
    lines.push(format!(
        "Duration: {}.{:03}s",
        summary.duration_ms / 1_000,
        summary.duration_ms % 1_000
    ));
    lines.push(format!("Total Requests: {}", metrics.total_requests));
    lines.push(format!(
        "Successful: {} ({}.{:02}%)",
        metrics.successful_requests,
        stats.success_rate_x100 / PERCENT_DIVISOR,
        stats.success_rate_x100 % PERCENT_DIVISOR
    ));
    lines.push(format!("Errors: {}", metrics.error_requests));
    lines.push(format!("Timeouts: {}", metrics.timeout_requests));
    lines.push(format!("Transport Errors: {}", metrics.transport_errors));
    lines.push(format!("Non-Expected Status: {}", metrics.non_expected_status));
    lines.push(format!(
        "Priority High/Low: {} / {}",
        metrics.high_priority_requests, metrics.low_priority_requests
    ));
    lines.push(format!("Fast Track: {}", metrics.fast_track_requests));
    lines.push(format!("Avg Latency: {}ms", metrics.avg_latency_ms));
    lines.push(format!(
        "Min/Max Latency: {}ms / {}ms",
        metrics.min_latency_ms, metrics.max_latency_ms
    ));
    lines.push(format!(
        "P50/P90/P99 Latency: {}ms / {}ms / {}ms",
        metrics.p50_latency_ms, metrics.p90_latency_ms, metrics.p99_latency_ms
    ));
    lines.push(format!(
        "Avg RPS: {}.{:02}",
        stats.avg_rps_x100 / PERCENT_DIVISOR,
        stats.avg_rps_x100 % PERCENT_DIVISOR
    ));
    lines.push(format!("Received: {} bytes", metrics.total_bytes));
    lines.push("Checks:".to_owned());
    for check in &summary.checks {
        let mark = if check.fails == 0 { "ok" } else { "FAIL" };
        lines.push(format!(
            "  [{}] {}: {} passed, {} failed",
            mark, check.name, check.passes, check.fails
        ));
    }
    lines
}

/// Prints the summary to stdout in the requested format.
///
/// # Errors
///
/// Returns an error when the JSON rendering fails.
pub(crate) fn print_summary(summary: &RunSummary, format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for line in summary_lines(summary) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
    }
    Ok(())
}
