use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse fixture file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Fixture file '{path}' must contain a JSON array, found {found}.")]
    NotArray { path: PathBuf, found: &'static str },
    #[error("Fixture set from {origin} has no entries.")]
    Empty { origin: String },
}
