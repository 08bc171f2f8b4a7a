//! Named response checks and their pass/fail counters.
mod counters;


use serde::Serialize;
use serde_json::Value;

use crate::http::RawResponse;

pub use counters::{CheckCounters, CheckSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    #[serde(rename = "status_is_200")]
    StatusIs200,
    ResponseHasNoError,
}

impl CheckName {
    pub const ALL: [CheckName; 2] = [CheckName::StatusIs200, CheckName::ResponseHasNoError];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusIs200 => "status_is_200",
            Self::ResponseHasNoError => "response_has_no_error",
        }
    }
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of both checks for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckOutcome {
    pub status_ok: bool,
    pub no_error: bool,
}

impl CheckOutcome {
    /// Outcome recorded when no response was received.
    pub const FAILED: CheckOutcome = CheckOutcome {
        status_ok: false,
        no_error: false,
    };

    #[must_use]
    pub const fn get(self, name: CheckName) -> bool {
        match name {
            CheckName::StatusIs200 => self.status_ok,
            CheckName::ResponseHasNoError => self.no_error,
        }
    }

    #[must_use]
    pub const fn passed(self) -> bool {
        self.status_ok && self.no_error
    }
}

/// Evaluates both checks independently; neither short-circuits the other.
#[must_use]
pub fn evaluate(response: &RawResponse, expected_status: u16) -> CheckOutcome {
    CheckOutcome {
        status_ok: response.status == expected_status,
        no_error: body_has_no_error(&response.body),
    }
}

/// True when the body is JSON without a top-level `error` member.
///
/// Bodies that are not JSON fail. A falsy error member (`null`, `false`, `0`,
/// `""`) counts as absent.
#[must_use]
pub fn body_has_no_error(body: &[u8]) -> bool {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map.get("error").is_none_or(is_falsy),
        Ok(_) => true,
        Err(err) => {
            tracing::debug!("Response body is not JSON: {}", err);
            false
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
