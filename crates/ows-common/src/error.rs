//! Error types for the OWS data core.

use thiserror::Error;

/// Result type alias using OwsError.
pub type OwsResult<T> = Result<T, OwsError>;

/// Primary error type for the data core.
#[derive(Debug, Error)]
pub enum OwsError {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === Resolution Errors ===
    #[error("Resolution error: {0}")]
    Resolution(String),

    // === Data Errors ===
    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    #[error("Band not found: {0}")]
    BandNotFound(String),

    #[error("Band '{0}' has no declared no-data value")]
    NoDataUndefined(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl OwsError {
    /// True for errors that must surface before the service starts serving.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OwsError::Config(_))
    }
}
