//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. The
//! intent is to avoid reading process-wide environment variables during request handling, which
//! can lead to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_PORT};
use crate::{CatalogError, CatalogResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidInput`] if `data_dir` is empty.
    pub fn new(data_dir: PathBuf) -> CatalogResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CatalogError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self { data_dir })
    }

    /// Root directory of the document store.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding the documents of one collection.
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.data_dir.join(collection)
    }
}

/// Parse the document store directory from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse the HTTP listening port from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PORT`].
///
/// # Errors
///
/// Returns [`CatalogError::InvalidInput`] if the value is not a port number in `1..=65535`.
pub fn port_from_env_value(value: Option<String>) -> CatalogResult<u16> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(raw) = value else {
        return Ok(DEFAULT_PORT);
    };

    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(CatalogError::InvalidInput(format!(
            "PORT must be a number between 1 and 65535, got: '{}'",
            raw
        ))),
        Ok(port) => Ok(port),
    }
}
