use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::{CheckName, CheckOutcome};

#[derive(Debug, Default)]
struct PassFail {
    passes: AtomicU64,
    fails: AtomicU64,
}

impl PassFail {
    fn record(&self, passed: bool) {
        let counter = if passed { &self.passes } else { &self.fails };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Lock-free pass/fail tallies shared by every worker.
#[derive(Debug, Default)]
pub struct CheckCounters {
    status_is_200: PassFail,
    response_has_no_error: PassFail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub name: CheckName,
    pub passes: u64,
    pub fails: u64,
}

impl CheckCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: CheckOutcome) {
        for name in CheckName::ALL {
            self.slot(name).record(outcome.get(name));
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<CheckSummary> {
        CheckName::ALL
            .iter()
            .map(|&name| {
                let slot = self.slot(name);
                CheckSummary {
                    name,
                    passes: slot.passes.load(Ordering::Relaxed),
                    fails: slot.fails.load(Ordering::Relaxed),
                }
            })
            .collect()
    }

    const fn slot(&self, name: CheckName) -> &PassFail {
        match name {
            CheckName::StatusIs200 => &self.status_is_200,
            CheckName::ResponseHasNoError => &self.response_has_no_error,
        }
    }
}
