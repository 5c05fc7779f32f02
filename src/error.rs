//! Error types for appliance access and inventory export.

use std::path::PathBuf;

/// Errors raised while talking to the appliance.
#[derive(Debug, thiserror::Error)]
pub enum ApplianceError {
    #[error("filesystem not found: {0}")]
    FilesystemNotFound(String),

    #[error("invalid appliance URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("invalid credential header {0}")]
    InvalidHeader(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("unreadable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised while writing the export pair.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
