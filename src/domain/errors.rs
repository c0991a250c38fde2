//! Domain error types
//!
//! This module defines the error hierarchy for Leadex.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Leadex error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum LeadexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Output sink errors
    #[error("Sink error: {0}")]
    Sink(String),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Record store errors
///
/// Errors that occur when talking to the backing key-value store.
/// These errors don't expose the Redis client's types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// A command was rejected or failed mid-flight
    #[error("Store command failed: {0}")]
    CommandFailed(String),

    /// Timeout
    #[error("Store request timeout: {0}")]
    Timeout(String),

    /// The store answered with something we could not interpret
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::ConnectionFailed(_) | StoreError::Timeout(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LeadexError {
    fn from(err: std::io::Error) -> Self {
        LeadexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LeadexError {
    fn from(err: serde_json::Error) -> Self {
        LeadexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LeadexError {
    fn from(err: toml::de::Error) -> Self {
        LeadexError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors
impl From<csv::Error> for LeadexError {
    fn from(err: csv::Error) -> Self {
        LeadexError::Sink(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leadex_error_display() {
        let err = LeadexError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Timeout("GET lead_a".to_string());
        let err: LeadexError = store_err.into();
        assert!(matches!(err, LeadexError::Store(_)));
        assert_eq!(
            err.to_string(),
            "Store error: Store request timeout: GET lead_a"
        );
    }

    #[test]
    fn test_store_error_transience() {
        assert!(StoreError::Timeout("t".to_string()).is_transient());
        assert!(StoreError::ConnectionFailed("c".to_string()).is_transient());
        assert!(!StoreError::InvalidResponse("r".to_string()).is_transient());
        assert!(!StoreError::CommandFailed("WRONGTYPE".to_string()).is_transient());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: LeadexError = io_err.into();
        assert!(matches!(err, LeadexError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: LeadexError = json_err.into();
        assert!(matches!(err, LeadexError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: LeadexError = toml_err.into();
        assert!(matches!(err, LeadexError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_leadex_error_implements_std_error() {
        let err = LeadexError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
