//! Core library for the `bundle-loadtest` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, configuration parsing, fixture loading, JSON-RPC bundle
//! synthesis, request execution, response checks, and metrics aggregation.
//! The primary user-facing interface is the `bundle-loadtest` command-line
//! application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod checks;
pub mod config;
pub mod error;
pub mod fixture;
pub mod http;
pub mod metrics;
pub mod rpc;
pub mod shutdown;
