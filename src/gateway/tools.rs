//! Tool discovery and execution against the sensor tool server.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::ToolGatewayConfig;
use crate::error::EngineError;
use crate::gateway::catalogue::default_catalogue;
use crate::types::ToolSpec;

/// Where a turn's tool catalogue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    /// Fetched from the live tool server.
    Live,
    /// The fixed fallback catalogue; the server was unreachable.
    BuiltIn,
}

/// The tool catalogue available to one turn.
#[derive(Debug, Clone)]
pub struct ToolDiscovery {
    pub specs: Vec<ToolSpec>,
    pub source: DiscoverySource,
}

impl ToolDiscovery {
    pub fn live(specs: Vec<ToolSpec>) -> Self {
        Self {
            specs,
            source: DiscoverySource::Live,
        }
    }

    pub fn built_in() -> Self {
        Self {
            specs: default_catalogue(),
            source: DiscoverySource::BuiltIn,
        }
    }
}

/// Result of executing one tool.
///
/// Execution failure is not fatal to a turn; the failure text is folded
/// back into the conversation so the model can react to it.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    Completed(Value),
    Failed(String),
}

impl ToolOutcome {
    /// The value to hand back to the model as the tool result.
    pub fn into_value(self) -> Value {
        match self {
            ToolOutcome::Completed(value) => value,
            ToolOutcome::Failed(message) => json!({ "error": message }),
        }
    }

    pub fn as_completed(&self) -> Option<&Value> {
        match self {
            ToolOutcome::Completed(value) => Some(value),
            ToolOutcome::Failed(_) => None,
        }
    }
}

/// Contract the orchestrator uses to discover and run tools.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// List the tools available for the current turn. Never fails; a
    /// discovery problem degrades to the built-in catalogue.
    async fn discover(&self) -> ToolDiscovery;

    /// Execute a named tool with structured arguments.
    async fn execute(&self, name: &str, arguments: Value) -> ToolOutcome;
}

/// HTTP client for the tool server.
///
/// `GET {base}/tools` lists specs; `POST {base}/tools/{name}` executes.
pub struct ToolGateway {
    client: reqwest::Client,
    config: ToolGatewayConfig,
}

impl ToolGateway {
    pub fn new(client: reqwest::Client, config: ToolGatewayConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_tools(&self) -> Result<Vec<ToolSpec>, EngineError> {
        let response = self.client.get(self.endpoint("tools")).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::api_error(status.as_u16(), error_text));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ToolExecutor for ToolGateway {
    async fn discover(&self) -> ToolDiscovery {
        match self.fetch_tools().await {
            Ok(specs) => ToolDiscovery::live(specs),
            Err(e) => {
                tracing::warn!(error = %e, "tool discovery failed, using built-in catalogue");
                ToolDiscovery::built_in()
            }
        }
    }

    async fn execute(&self, name: &str, arguments: Value) -> ToolOutcome {
        let response = match self
            .client
            .post(self.endpoint(&format!("tools/{name}")))
            .json(&arguments)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool request failed");
                return ToolOutcome::Failed(format!("Tool execution failed: {e}"));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(tool = name, %status, "tool server returned an error");
            return ToolOutcome::Failed(format!(
                "Tool execution failed: HTTP {}",
                status.as_u16()
            ));
        }

        match response.json::<Value>().await {
            Ok(value) => ToolOutcome::Completed(value),
            Err(e) => ToolOutcome::Failed(format!("Tool execution failed: {e}")),
        }
    }
}
