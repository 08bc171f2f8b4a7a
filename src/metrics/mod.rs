//! Metrics collection, aggregation, and histogram utilities.
mod collector;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use collector::setup_metrics_collector;
pub use histogram::{LatencyHistogram, LatencyPercentiles};
pub use types::{Metrics, MetricsReport, MetricsSummary};
