//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::HostId;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The requested host does not exist in storage
    #[error("Host not found: {0}")]
    HostNotFound(HostId),

    /// The session-management service could not be reached
    #[error("Session service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be loaded or written
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Whether the error is part of normal operation (bad input, missing
    /// host, service not running) rather than a fault.
    ///
    /// Log at `warn` when `true`, at `error` when `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::HostNotFound(_) | Self::ServiceUnavailable(_) | Self::ValidationError(_) => true,
            Self::StorageError(_) | Self::SerializationError(_) | Self::ConfigError(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
