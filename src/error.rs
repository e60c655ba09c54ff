//! Error types for the fallible edges of the browser.
//!
//! None of these ever reach the user as a crash: fetch errors turn into a
//! fixed failure message, store errors are logged and swallowed, and an
//! [`InvalidId`] makes the requested operation a no-op.

use thiserror::Error;

/// Why a collection could not be loaded from its data source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records, got {0}")]
    NotAnArray(&'static str),
}

/// Failures of the key/value preference backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preference store is unavailable")]
    Unavailable,
}

/// An identifier that is not a non-negative integer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed item identifier: {0}")]
pub struct InvalidId(pub String);
