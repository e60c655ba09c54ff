//! Concrete data sources: the remote JSON endpoints and local JSON files.

use std::path::PathBuf;

use serde_json::Value;

use super::DataSource;
use crate::error::FetchError;

/// A read-only HTTP(S) endpoint returning a JSON array.
pub struct HttpSource {
    /// The endpoint URL.
    pub url: String,
    /// Label used in logs.
    pub label: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

impl DataSource for HttpSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Value, FetchError> {
        // No timeout and no status check: a non-JSON error page fails to
        // parse, which is reported the same way as a network failure.
        let body = reqwest::blocking::get(&self.url)?.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// A JSON file on disk, for working against exported data.
pub struct FileSource {
    pub path: PathBuf,
    pub label: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

impl DataSource for FileSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<Value, FetchError> {
        let body = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
