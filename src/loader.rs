//! Loading source documents from files and URLs.
//!
//! OpenAPI documents ship as either JSON or YAML; since JSON is valid
//! YAML, everything goes through the YAML parser into ordered JSON values.

use std::path::Path;

use serde_json::Value;

use crate::error::ConvertError;

#[cfg(feature = "remote")]
use std::time::Duration;
#[cfg(feature = "remote")]
use tracing::info;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `FileNotFound` if the file doesn't exist, `ReadError` if it
/// cannot be read, or `InvalidDocument` if it isn't valid YAML/JSON.
pub fn load_document(path: &Path) -> Result<Value, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConvertError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Parse a document from a YAML or JSON string.
///
/// # Errors
///
/// Returns `InvalidDocument` if the content isn't valid YAML/JSON.
pub fn load_document_str(content: &str) -> Result<Value, ConvertError> {
    serde_yaml::from_str(content).map_err(|source| ConvertError::InvalidDocument { source })
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `NetworkError` if the request fails, or `InvalidDocument` if
/// the response body isn't valid YAML/JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, ConvertError> {
    info!("downloading {}", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| ConvertError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|source| ConvertError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let body = response.text().map_err(|source| ConvertError::NetworkError {
        url: url.to_string(),
        source,
    })?;

    load_document_str(&body)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL, detected automatically.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_document_auto(source: &str) -> Result<Value, ConvertError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(ConvertError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}
