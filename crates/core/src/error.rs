//! Error types for the Nexus workspace.
//!
//! This module defines a unified error enum that covers the error categories
//! of the application: configuration, I/O, index and serialization errors.

use thiserror::Error;

/// Unified error type for the Nexus application layer.
///
/// The index crate has its own narrow error type; it converts into
/// `AppError::Index` at the application boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vector index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
