use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_BASE_BLOCK, DEFAULT_BLOCK_OFFSET, DEFAULT_FIXTURES_PATH, DEFAULT_MAX_RESPONSE_BYTES,
    DEFAULT_PRIORITY_HEADER, DEFAULT_RPC_METHOD, DEFAULT_STATE_BLOCK,
};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
    parse_ratio,
};
use super::types::{OutputFormat, PositiveU64, PositiveUsize, Ratio};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async load generator for eth_callBundle JSON-RPC endpoints.",
    next_help_heading = "Advanced Options"
)]
pub struct TesterArgs {
    /// JSON-RPC endpoint to send bundles to
    #[arg(long, short, env = "BUNDLE_LOADTEST_URL", help_heading = "Common Options")]
    pub url: Option<String>,

    /// JSON file holding an array of raw transactions
    #[arg(
        long = "fixtures",
        short = 'f',
        env = "BUNDLE_LOADTEST_FIXTURES",
        default_value = DEFAULT_FIXTURES_PATH,
        help_heading = "Common Options"
    )]
    pub fixtures: String,

    /// Duration of test (seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "30",
        value_parser = parse_positive_u64,
        help_heading = "Common Options"
    )]
    pub target_duration: PositiveU64,

    /// Stop after N total requests
    #[arg(long = "requests", short = 'n', value_parser = parse_positive_u64, help_heading = "Common Options")]
    pub requests: Option<PositiveU64>,

    /// Number of concurrent virtual workers
    #[arg(
        long = "max-tasks",
        short = 'c',
        alias = "concurrency",
        default_value = "10",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub max_tasks: PositiveUsize,

    /// Workers started per spawn tick
    #[arg(long = "spawn-rate", default_value = "10", value_parser = parse_positive_usize)]
    pub spawn_rate_per_tick: PositiveUsize,

    /// Spawn tick interval (ms)
    #[arg(long = "spawn-interval", default_value = "100", value_parser = parse_positive_u64)]
    pub tick_interval: PositiveU64,

    /// Global request rate limit (requests per second)
    #[arg(long = "rate", short = 'r', value_parser = parse_positive_u64, help_heading = "Common Options")]
    pub rate_limit: Option<PositiveU64>,

    /// Pause between iterations of one worker (supports ms/s/m/h)
    #[arg(long = "think-time", value_parser = parse_duration_arg)]
    pub think_time: Option<Duration>,

    /// Wait for in-flight requests when the run ends instead of cancelling them
    #[arg(long = "wait-ongoing")]
    pub wait_ongoing: bool,

    /// Extra HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long, short = 'H', value_parser = parse_header, help_heading = "Common Options")]
    pub headers: Vec<(String, String)>,

    /// Header carrying the priority flag
    #[arg(long = "priority-header", default_value = DEFAULT_PRIORITY_HEADER)]
    pub priority_header: String,

    /// Share of requests tagged high priority (0.0 - 1.0)
    #[arg(
        long = "high-priority-ratio",
        default_value = "0.5",
        value_parser = parse_ratio,
        help_heading = "Common Options"
    )]
    pub high_priority_ratio: Ratio,

    /// Share of requests sent with X-Fast-Track: true (0.0 - 1.0)
    #[arg(long = "fast-track-ratio", default_value = "0", value_parser = parse_ratio)]
    pub fast_track_ratio: Ratio,

    /// JSON-RPC method name
    #[arg(long = "rpc-method", default_value = DEFAULT_RPC_METHOD)]
    pub rpc_method: String,

    /// JSON-RPC request id
    #[arg(long = "request-id", default_value = "1")]
    pub request_id: u64,

    /// Base block number; blockNumber is sent as base + offset
    #[arg(long = "base-block", default_value = DEFAULT_BASE_BLOCK)]
    pub base_block: u64,

    /// Offset added to the base block number
    #[arg(long = "block-offset", default_value = DEFAULT_BLOCK_OFFSET)]
    pub block_offset: u64,

    /// stateBlockNumber tag sent with every bundle
    #[arg(long = "state-block", default_value = DEFAULT_STATE_BLOCK)]
    pub state_block: String,

    /// Expected HTTP status code
    #[arg(
        long = "status",
        short = 's',
        default_value = "200",
        help_heading = "Common Options"
    )]
    pub expected_status_code: u16,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg,
        help_heading = "Common Options"
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Maximum response body size to read (bytes)
    #[arg(
        long = "max-response-bytes",
        default_value = DEFAULT_MAX_RESPONSE_BYTES,
        value_parser = parse_positive_u64
    )]
    pub max_response_bytes: PositiveU64,

    /// Disable keep-alive (prevents re-use of TCP connections)
    #[arg(long = "disable-keepalive")]
    pub disable_keepalive: bool,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long = "insecure", short = 'k')]
    pub insecure: bool,

    /// Disable the default User-Agent header
    #[arg(long = "no-ua")]
    pub no_ua: bool,

    /// Seed for fixture and priority selection (reproducible runs)
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Send one request before starting workers and abort if it fails
    #[arg(long = "preflight")]
    pub preflight: bool,

    /// Output format for the final summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "text",
        help_heading = "Common Options"
    )]
    pub output_format: OutputFormat,

    /// Write the final summary as JSON to this path
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Exit with an error when any check failed
    #[arg(long = "fail-on-check")]
    pub fail_on_check: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by BUNDLE_LOADTEST_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug", help_heading = "Common Options")]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./bundle-loadtest.toml or ./bundle-loadtest.json if present.
    #[arg(long, help_heading = "Common Options")]
    pub config: Option<String>,
}
