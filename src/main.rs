mod app;
mod args;
mod checks;
mod config;
mod entry;
mod error;
mod fixture;
mod http;
mod logger;
mod metrics;
mod rpc;
mod shutdown;
mod shutdown_handlers;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
