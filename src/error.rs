//! Error types for the Vitrine viewer

use thiserror::Error;

/// Main error type for catalog, loading and rendering operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status
    #[error("server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response body was not valid JSON for a product list
    #[error("invalid catalog response: {0}")]
    Parse(String),

    /// The response was valid JSON but not an array
    #[error("catalog response is not a list of products")]
    NotAnArray,

    /// The catalog was fetched successfully but contains no products
    #[error("No products found in the API response")]
    EmptyCatalog,

    /// A product's 3D model could not be retrieved
    #[error("failed to load model {url}: {reason}")]
    ModelLoad { url: String, reason: String },

    /// A retrieved model could not be decoded into renderable geometry
    #[error("failed to decode model: {0}")]
    Decode(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    /// Window, event loop or task runtime failed (creation or a panicked task)
    #[error("platform error: {0}")]
    Platform(String),
}

impl From<reqwest::Error> for ViewerError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ViewerError::Status {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => ViewerError::Http(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(e: serde_json::Error) -> Self {
        ViewerError::Parse(e.to_string())
    }
}

impl From<gltf::Error> for ViewerError {
    fn from(e: gltf::Error) -> Self {
        ViewerError::Decode(e.to_string())
    }
}

impl From<tobj::LoadError> for ViewerError {
    fn from(e: tobj::LoadError) -> Self {
        ViewerError::Decode(e.to_string())
    }
}

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        assert!(matches!(ViewerError::from(err), ViewerError::Parse(_)));
    }

    #[test]
    fn test_empty_catalog_message() {
        assert_eq!(
            ViewerError::EmptyCatalog.to_string(),
            "No products found in the API response"
        );
    }
}
