use std::time::Duration;

use crate::rpc::Priority;

use super::super::{LatencyHistogram, LatencyPercentiles, Metrics, MetricsSummary};

pub(super) struct AggregationState {
    pub(super) total_requests: u64,
    pub(super) successful_requests: u64,
    pub(super) timeout_requests: u64,
    pub(super) transport_errors: u64,
    pub(super) non_expected_status: u64,
    pub(super) high_priority_requests: u64,
    pub(super) low_priority_requests: u64,
    pub(super) fast_track_requests: u64,
    pub(super) latency_sum_ms: u128,
    pub(super) min_latency_ms: u64,
    pub(super) max_latency_ms: u64,
    pub(super) total_bytes: u64,
    pub(super) histogram: Option<LatencyHistogram>,
}

impl AggregationState {
    pub(super) fn new() -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                tracing::warn!("Latency percentiles disabled: {}", err);
                None
            }
        };

        Self {
            total_requests: 0,
            successful_requests: 0,
            timeout_requests: 0,
            transport_errors: 0,
            non_expected_status: 0,
            high_priority_requests: 0,
            low_priority_requests: 0,
            fast_track_requests: 0,
            latency_sum_ms: 0,
            min_latency_ms: u64::MAX,
            max_latency_ms: 0,
            total_bytes: 0,
            histogram,
        }
    }

    pub(super) fn process(&mut self, msg: Metrics, expected_status_code: u16) {
        let latency_ms = u64::try_from(msg.response_time.as_millis()).unwrap_or(u64::MAX);

        self.total_requests = self.total_requests.saturating_add(1);
        if msg.is_success() {
            self.successful_requests = self.successful_requests.saturating_add(1);
        }
        if msg.timed_out {
            self.timeout_requests = self.timeout_requests.saturating_add(1);
        } else if msg.transport_error {
            self.transport_errors = self.transport_errors.saturating_add(1);
        } else if msg.status_code != expected_status_code {
            self.non_expected_status = self.non_expected_status.saturating_add(1);
        }

        match msg.priority {
            Priority::High => {
                self.high_priority_requests = self.high_priority_requests.saturating_add(1);
            }
            Priority::Low => {
                self.low_priority_requests = self.low_priority_requests.saturating_add(1);
            }
        }
        if msg.fast_track {
            self.fast_track_requests = self.fast_track_requests.saturating_add(1);
        }

        self.total_bytes = self.total_bytes.saturating_add(msg.response_bytes);
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
        if latency_ms < self.min_latency_ms {
            self.min_latency_ms = latency_ms;
        }
        if latency_ms > self.max_latency_ms {
            self.max_latency_ms = latency_ms;
        }

        if let Some(histogram) = self.histogram.as_mut() {
            histogram.record(latency_ms);
        }
    }

    /// Current throughput in requests per second over `elapsed`.
    pub(super) fn rps(&self, elapsed: Duration) -> u64 {
        let elapsed_ms = elapsed.as_millis().max(1);
        let scaled = u128::from(self.total_requests)
            .saturating_mul(1_000)
            .checked_div(elapsed_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    pub(super) fn summarize(&self, duration: Duration) -> MetricsSummary {
        let has_requests = self.total_requests > 0;
        let avg_latency_ms = if has_requests {
            let avg = self
                .latency_sum_ms
                .checked_div(u128::from(self.total_requests))
                .unwrap_or(0);
            u64::try_from(avg).unwrap_or(u64::MAX)
        } else {
            0
        };
        let percentiles = self
            .histogram
            .as_ref()
            .map_or_else(LatencyPercentiles::default, LatencyHistogram::percentiles);

        MetricsSummary {
            duration,
            total_requests: self.total_requests,
            successful_requests: self.successful_requests,
            error_requests: self.total_requests.saturating_sub(self.successful_requests),
            timeout_requests: self.timeout_requests,
            transport_errors: self.transport_errors,
            non_expected_status: self.non_expected_status,
            high_priority_requests: self.high_priority_requests,
            low_priority_requests: self.low_priority_requests,
            fast_track_requests: self.fast_track_requests,
            min_latency_ms: if has_requests { self.min_latency_ms } else { 0 },
            max_latency_ms: self.max_latency_ms,
            avg_latency_ms,
            p50_latency_ms: percentiles.p50,
            p90_latency_ms: percentiles.p90,
            p99_latency_ms: percentiles.p99,
            total_bytes: self.total_bytes,
        }
    }
}
