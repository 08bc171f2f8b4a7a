//! Fixture loading: the shared, read-only set of raw transactions.
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use serde_json::Value;

use crate::error::FixtureError;


/// Immutable sequence of opaque fixture payloads.
///
/// Cloning only bumps a reference count, so every worker reads the same
/// allocation for the whole run.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    items: Arc<[Value]>,
}

impl FixtureSet {
    /// Reads `path` and parses it as a non-empty JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, is not valid JSON, is
    /// not an array, or is an empty array.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read(path).map_err(|err| FixtureError::Read {
            path: path.to_path_buf(),
            source: err,
        })?;
        let value: Value = serde_json::from_slice(&content).map_err(|err| FixtureError::Parse {
            path: path.to_path_buf(),
            source: err,
        })?;
        let Value::Array(items) = value else {
            return Err(FixtureError::NotArray {
                path: path.to_path_buf(),
                found: json_kind(&value),
            });
        };
        let fixtures = Self::from_values(items, &path.display().to_string())?;
        tracing::info!("Loaded {} fixtures from {}", fixtures.len(), path.display());
        Ok(fixtures)
    }

    /// Builds a fixture set from parsed values; `origin` names their source in errors.
    ///
    /// # Errors
    ///
    /// Returns an error when `items` is empty.
    pub fn from_values(items: Vec<Value>, origin: &str) -> Result<Self, FixtureError> {
        if items.is_empty() {
            return Err(FixtureError::Empty {
                origin: origin.to_owned(),
            });
        }
        Ok(Self {
            items: items.into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Uniform draw over `[0, len)`.
    pub fn pick<R>(&self, rng: &mut R) -> Option<(usize, &Value)>
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.len());
        self.get(index).map(|tx| (index, tx))
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
