use serde::Serialize;
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 envelope. Borrows the fixture so no payload is copied per request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'req> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'req str,
    pub params: [CallBundleParams<'req>; 1],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallBundleParams<'req> {
    pub txs: [&'req Value; 1],
    pub block_number: &'req str,
    pub state_block_number: &'req str,
}

impl JsonRpcRequest<'_> {
    /// Serializes the request body.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture value cannot be serialized.
    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
