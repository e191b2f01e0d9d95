//! Error types for the lead intake system

use thiserror::Error;

/// Main error type for all lead intake operations
#[derive(Error, Debug)]
pub enum LeadsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl LeadsError {
    /// Whether the caller sent something we refuse to accept
    pub fn is_client_error(&self) -> bool {
        matches!(self, LeadsError::Validation(_))
    }
}

/// Result type for lead intake operations
pub type Result<T> = std::result::Result<T, LeadsError>;
