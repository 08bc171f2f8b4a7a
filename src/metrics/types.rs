use std::time::Duration;

use serde::Serialize;

use crate::checks::CheckOutcome;
use crate::rpc::Priority;

/// One finished iteration as reported by a worker.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub response_time: Duration,
    /// 0 when no response was received.
    pub status_code: u16,
    pub timed_out: bool,
    pub transport_error: bool,
    pub checks: CheckOutcome,
    pub priority: Priority,
    pub fast_track: bool,
    pub response_bytes: u64,
}

impl Metrics {
    /// An iteration counts as successful only when every check passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.checks.passed()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    #[serde(skip)]
    pub duration: Duration,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub error_requests: u64,
    pub timeout_requests: u64,
    pub transport_errors: u64,
    pub non_expected_status: u64,
    pub high_priority_requests: u64,
    pub low_priority_requests: u64,
    pub fast_track_requests: u64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub avg_latency_ms: u64,
    pub p50_latency_ms: u64,
    pub p90_latency_ms: u64,
    pub p99_latency_ms: u64,
    pub total_bytes: u64,
}

#[derive(Debug)]
pub struct MetricsReport {
    pub summary: MetricsSummary,
}
