//! Error types for sqlpeek

use thiserror::Error;

/// Result type alias for sqlpeek operations.
pub type PeekResult<T> = Result<T, PeekError>;

/// Errors raised at the edges of the engine.
///
/// Rendering itself never fails; these cover turning caller input into
/// [`Params`](crate::Params).
#[derive(Debug, Error)]
pub enum PeekError {
    /// A `name=value` assignment could not be parsed.
    #[error("Invalid parameter '{input}': {message}")]
    InvalidParam { input: String, message: String },

    /// A parameter document could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PeekError {
    /// Create an invalid parameter error.
    pub fn invalid_param(input: impl Into<String>, message: impl Into<String>) -> Self {
        PeekError::InvalidParam {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PeekError {
    fn from(e: serde_json::Error) -> Self {
        PeekError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for PeekError {
    fn from(e: toml::de::Error) -> Self {
        PeekError::Serialization(e.to_string())
    }
}
