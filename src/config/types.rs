use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_arg};
use crate::error::ValidationError;

/// Every field mirrors a CLI option; absent fields leave the CLI value alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub fixtures: Option<String>,
    pub duration: Option<u64>,
    pub requests: Option<u64>,
    #[serde(alias = "concurrency", alias = "vus")]
    pub max_tasks: Option<usize>,
    pub spawn_rate: Option<usize>,
    pub spawn_interval: Option<u64>,
    pub rate: Option<u64>,
    pub think_time: Option<DurationValue>,
    pub wait_ongoing: Option<bool>,
    pub headers: Option<Vec<String>>,
    pub priority_header: Option<String>,
    pub high_priority_ratio: Option<f64>,
    pub fast_track_ratio: Option<f64>,
    pub rpc_method: Option<String>,
    pub request_id: Option<u64>,
    pub base_block: Option<u64>,
    pub block_offset: Option<u64>,
    pub state_block: Option<String>,
    pub status: Option<u16>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub max_response_bytes: Option<u64>,
    pub disable_keepalive: Option<bool>,
    pub insecure: Option<bool>,
    pub no_ua: Option<bool>,
    pub seed: Option<u64>,
    pub preflight: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub export_json: Option<String>,
    pub fail_on_check: Option<bool>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Either whole seconds (`30`) or a string with a unit suffix (`"500ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
