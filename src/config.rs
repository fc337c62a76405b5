//! Engine configuration and HTTP client construction.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::EngineError;

/// Default per-read timeout for the generation stream.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Default total timeout for one tool server request.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the generation upstream.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL of the OpenAI-compatible API, without the trailing path.
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    /// Bound on the gap between stream reads, not on the whole stream.
    pub read_timeout: Duration,
}

impl GenerationConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: SecretString::from(api_key.into()),
            model: model.into(),
            read_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// Connection settings for the tool server.
#[derive(Debug, Clone)]
pub struct ToolGatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ToolGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub generation: GenerationConfig,
    pub tools: ToolGatewayConfig,
}

impl EngineConfig {
    /// Read configuration from the environment.
    ///
    /// `LLM_API_BASE_URL`, `LLM_API_KEY`, `LLM_MODEL` and `MCP_SERVER_URL`
    /// are required. `LLM_TIMEOUT_SECS` and `MCP_TIMEOUT_SECS` override the
    /// default timeouts.
    pub fn from_env() -> Result<Self, EngineError> {
        let generation = GenerationConfig::new(
            require_env("LLM_API_BASE_URL")?,
            require_env("LLM_API_KEY")?,
            require_env("LLM_MODEL")?,
        )
        .with_read_timeout(parse_secs(
            "LLM_TIMEOUT_SECS",
            std::env::var("LLM_TIMEOUT_SECS").ok(),
            DEFAULT_GENERATION_TIMEOUT,
        )?);

        let tools = ToolGatewayConfig::new(require_env("MCP_SERVER_URL")?).with_timeout(
            parse_secs(
                "MCP_TIMEOUT_SECS",
                std::env::var("MCP_TIMEOUT_SECS").ok(),
                DEFAULT_TOOL_TIMEOUT,
            )?,
        );

        Ok(Self { generation, tools })
    }
}

fn require_env(key: &str) -> Result<String, EngineError> {
    std::env::var(key)
        .map_err(|_| EngineError::ConfigurationError(format!("missing environment variable {key}")))
}

fn parse_secs(
    key: &str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, EngineError> {
    match raw {
        Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
            EngineError::ConfigurationError(format!("{key} must be an integer number of seconds"))
        }),
        None => Ok(default),
    }
}

/// Build the two HTTP clients the gateways use.
///
/// The generation client carries a read timeout so an idle stream is bounded
/// without capping total stream duration; the tool client carries a total
/// request timeout.
pub fn build_http_clients(
    config: &EngineConfig,
) -> Result<(reqwest::Client, reqwest::Client), EngineError> {
    let generation = reqwest::Client::builder()
        .read_timeout(config.generation.read_timeout)
        .build()
        .map_err(|e| {
            EngineError::ConfigurationError(format!("failed to build generation client: {e}"))
        })?;
    let tools = reqwest::Client::builder()
        .timeout(config.tools.timeout)
        .build()
        .map_err(|e| EngineError::ConfigurationError(format!("failed to build tool client: {e}")))?;
    Ok((generation, tools))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_apply() {
        let generation = GenerationConfig::new("http://localhost:9000/v1", "key", "gpt-4o");
        assert_eq!(generation.read_timeout, Duration::from_secs(120));

        let tools = ToolGatewayConfig::new("http://localhost:8001");
        assert_eq!(tools.timeout, Duration::from_secs(60));
    }

    #[test]
    fn parse_secs_accepts_integers() {
        let parsed = parse_secs("LLM_TIMEOUT_SECS", Some("30".to_string()), DEFAULT_GENERATION_TIMEOUT)
            .unwrap();
        assert_eq!(parsed, Duration::from_secs(30));
    }

    #[test]
    fn parse_secs_rejects_garbage() {
        let err = parse_secs("MCP_TIMEOUT_SECS", Some("soon".to_string()), DEFAULT_TOOL_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationError(_)));
    }

    #[test]
    fn parse_secs_falls_back_to_default() {
        let parsed = parse_secs("MCP_TIMEOUT_SECS", None, DEFAULT_TOOL_TIMEOUT).unwrap();
        assert_eq!(parsed, DEFAULT_TOOL_TIMEOUT);
    }
}
