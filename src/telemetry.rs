//! Tracing setup for services embedding the engine.
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! the embedding service's job. These helpers cover the common case so a
//! binary can get structured logs with one call.

use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_FILTER: &str = "fabchat=info";

/// Output format for engine logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line text.
    #[default]
    Text,
    /// Structured JSON, one object per line.
    Json,
}

/// Install a global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set and falls back to
/// `fabchat=info`. A subscriber installed earlier in the process wins;
/// calling this again is not an error.
pub fn init_tracing(format: LogFormat) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let result = match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init(),
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.to_string().contains("already been set") => Ok(()),
        Err(e) => Err(EngineError::ConfigurationError(format!(
            "failed to install tracing subscriber: {e}"
        ))),
    }
}

/// Install the subscriber with the format taken from `FABCHAT_LOG_FORMAT`
/// (`text` or `json`; unset means text).
pub fn init_tracing_from_env() -> Result<(), EngineError> {
    let format = match std::env::var("FABCHAT_LOG_FORMAT") {
        Ok(raw) => parse_format(&raw)?,
        Err(_) => LogFormat::default(),
    };
    init_tracing(format)
}

fn parse_format(raw: &str) -> Result<LogFormat, EngineError> {
    match raw.to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => Err(EngineError::ConfigurationError(format!(
            "invalid FABCHAT_LOG_FORMAT {other:?}, expected \"text\" or \"json\""
        ))),
    }
}
