use hdrhistogram::Histogram;
use hdrhistogram::errors::CreationError;

/// Highest latency tracked exactly; slower responses land in the top bucket.
const MAX_TRACKED_LATENCY_MS: u64 = 3_600_000;
const SIGNIFICANT_FIGURES: u8 = 3;

/// Latency quantiles of a run, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyPercentiles {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
}

/// Millisecond latency distribution of bundle responses.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// # Errors
    ///
    /// Returns an error if hdrhistogram rejects the bounds.
    pub fn new() -> Result<Self, CreationError> {
        let hist = Histogram::<u64>::new_with_bounds(1, MAX_TRACKED_LATENCY_MS, SIGNIFICANT_FIGURES)?;
        Ok(Self { hist })
    }

    /// Sub-millisecond responses count as 1 ms; anything past an hour saturates.
    pub fn record(&mut self, latency_ms: u64) {
        self.hist.saturating_record(latency_ms.max(1));
    }

    #[must_use]
    pub fn percentiles(&self) -> LatencyPercentiles {
        if self.hist.is_empty() {
            return LatencyPercentiles::default();
        }
        LatencyPercentiles {
            p50: self.hist.value_at_quantile(0.5),
            p90: self.hist.value_at_quantile(0.9),
            p99: self.hist.value_at_quantile(0.99),
        }
    }
}
