//! Error types for EDA report ingestion.
//!
//! Data-shape problems inside a report never surface here: they are resolved
//! through fallbacks or reported as [`crate::defect::Defect`]s. This hierarchy
//! covers what the caller has to handle itself: unreadable artifacts, failed
//! fetches and invalid configuration.
//!
//! Errors are serializable so a frontend can branch on the `code` field.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the EDA library.
#[derive(Error, Debug)]
pub enum EdaError {
    /// A variable or feature name was not found.
    #[error("Feature '{0}' not found")]
    FeatureNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input had no usable rows or columns.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A remote collaborator answered with a non-success status.
    #[error("Request to '{endpoint}' failed with status {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "fetch" feature).
    #[cfg(feature = "fetch")]
    #[error("HTTP request error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FeatureNotFound(_) => "FEATURE_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyData(_) => "EMPTY_DATA",
            Self::BadStatus { .. } => "BAD_STATUS",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "fetch")]
            Self::Fetch(_) => "FETCH_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the page should offer a retry.
    ///
    /// Fetch-level failures are transient from the page's point of view; a
    /// malformed artifact or bad configuration will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::BadStatus { status, .. } => *status >= 500,
            Self::Io(_) => true,
            #[cfg(feature = "fetch")]
            Self::Fetch(_) => true,
            Self::WithContext { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Json(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::FeatureNotFound("RM".to_string()).error_code(),
            "FEATURE_NOT_FOUND"
        );
        assert_eq!(
            EdaError::BadStatus {
                endpoint: "/eda/statistics".to_string(),
                status: 404
            }
            .error_code(),
            "BAD_STATUS"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(
            EdaError::BadStatus {
                endpoint: "/monitoring/drift".to_string(),
                status: 503
            }
            .is_retryable()
        );
        assert!(
            !EdaError::BadStatus {
                endpoint: "/monitoring/drift".to_string(),
                status: 404
            }
            .is_retryable()
        );
        assert!(!EdaError::InvalidConfig("bins".to_string()).is_retryable());
    }

    #[test]
    fn test_error_serialization() {
        let error = EdaError::FeatureNotFound("LSTAT".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("FEATURE_NOT_FOUND"));
        assert!(json.contains("LSTAT"));
    }

    #[test]
    fn test_with_context() {
        let error = EdaError::EmptyData("no rows".to_string()).with_context("Profiling CSV");
        assert!(error.to_string().contains("Profiling CSV"));
        assert_eq!(error.error_code(), "EMPTY_DATA");
    }

    #[test]
    fn test_json_context() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let error = parsed.context("Reading report").unwrap_err();
        assert_eq!(error.error_code(), "JSON_ERROR");
        assert!(error.to_string().starts_with("Reading report"));
    }
}
