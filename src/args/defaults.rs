pub(crate) const DEFAULT_USER_AGENT: &str = concat!("bundle-loadtest/", env!("CARGO_PKG_VERSION"));

/// Block the load test was originally recorded against.
pub(crate) const DEFAULT_BASE_BLOCK: &str = "14050699";
pub(crate) const DEFAULT_BLOCK_OFFSET: &str = "10";
pub(crate) const DEFAULT_FIXTURES_PATH: &str = "transactions.json";
pub(crate) const DEFAULT_RPC_METHOD: &str = "eth_callBundle";
pub(crate) const DEFAULT_STATE_BLOCK: &str = "latest";
pub(crate) const DEFAULT_PRIORITY_HEADER: &str = "high_priority";
/// 8 MiB, matching the payload cap of the load balancer under test.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: &str = "8388608";
