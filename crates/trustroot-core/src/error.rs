//! Error types for the TRC document model

use thiserror::Error;

/// Result type alias using TrcError
pub type Result<T> = std::result::Result<T, TrcError>;

/// Errors raised while building, decoding or inspecting a TRC
///
/// Update validation has its own error taxonomy in `trustroot-validator`;
/// these only cover the document itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrcError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// AS identifier could not be parsed
    #[error("Invalid AS identifier: {0}")]
    InvalidAsId(String),

    /// Document is structurally inconsistent
    #[error("Structure violation: {0}")]
    Structure(String),
}

impl From<serde_json::Error> for TrcError {
    fn from(err: serde_json::Error) -> Self {
        TrcError::Serialization(err.to_string())
    }
}
