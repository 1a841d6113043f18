//! Domain-specific error types for reportlens

use thiserror::Error;

/// Main error type for the reportlens viewer client
#[derive(Error, Debug)]
pub enum ReportLensError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// All transport-level failures collapse here: connection refused,
    /// timeout, and non-success HTTP statuses are indistinguishable to the
    /// viewer, which only ever shows one fixed error presentation.
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for ReportLensError {
    fn from(err: anyhow::Error) -> Self {
        ReportLensError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReportLensError {
    fn from(err: serde_json::Error) -> Self {
        ReportLensError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ReportLensError {
    fn from(err: reqwest::Error) -> Self {
        ReportLensError::Http {
            message: err.to_string(),
        }
    }
}

/// Result type alias for reportlens operations
pub type Result<T> = std::result::Result<T, ReportLensError>;
