//! HTTP transport and the worker pool that drives it.
mod client;
mod rate;
mod sender;
mod transport;
mod workload;


pub use client::{build_client, parse_target_url};
pub use sender::{RunContext, setup_request_sender};
pub use transport::{RawResponse, Transport, TransportOptions};
