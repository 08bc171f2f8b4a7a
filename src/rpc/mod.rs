//! JSON-RPC request synthesis for `eth_callBundle` load.
mod priority;
mod request;
mod synth;


pub use priority::Priority;
pub use request::{CallBundleParams, JSONRPC_VERSION, JsonRpcRequest};
pub use synth::{BundleOptions, Synthesized, Synthesizer};
