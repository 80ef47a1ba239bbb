//! Error types for OpenAPI to JSON Schema conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors during loading, processing, or emission of schemas.
#[derive(Debug, Error)]
pub enum ConvertError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid document: {source}")]
    InvalidDocument {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot serialize {name}: {source}")]
    SerializeError {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    // Document/schema errors (exit code 2)
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("type {name} not found in document")]
    NotFound { name: String },

    #[error("{name} is not supported: {reason}")]
    UnsupportedType { name: String, reason: String },

    #[error("cyclic reference while dereferencing: {path}")]
    CyclicReference { path: String },
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::ReadError { .. } | Self::WriteError { .. } => 3,
            #[cfg(feature = "remote")]
            Self::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
