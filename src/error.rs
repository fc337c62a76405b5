//! Error types for the orchestration engine.
//!
//! All fallible operations in this crate return [`EngineError`]. Gateway
//! boundaries additionally use typed outcomes (`ToolDiscovery`,
//! `ToolOutcome`) so that recoverable conditions never travel as errors.

use thiserror::Error;

/// Unified error type for the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// HTTP transport error (request could not be sent or read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Upstream returned a non-success status.
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// Connection could not be established.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Malformed payload that could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error while consuming an event stream.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An operation exceeded its time bound.
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Conversation store failure.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EngineError {
    /// Construct an [`EngineError::ApiError`] from a status code and body.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
        }
    }

    /// A short rendering safe to show to end users.
    ///
    /// Transport and storage details are collapsed so that internal
    /// addresses or payloads never leak into the outward stream.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { code, .. } => format!("upstream error (status {code})"),
            Self::TimeoutError(_) => "the request timed out".to_string(),
            Self::ConfigurationError(msg) => format!("configuration error: {msg}"),
            Self::HttpError(_) | Self::ConnectionError(_) => {
                "could not reach the generation service".to_string()
            }
            Self::StorageError(_) => "failed to persist the conversation".to_string(),
            // Internal messages are authored in this crate and carry no
            // transport detail, so they pass through.
            Self::InternalError(msg) => msg.clone(),
            _ => "internal error".to_string(),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
