//! Streaming chat gateway to the OpenAI-compatible generation upstream.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::config::GenerationConfig;
use crate::decode::{ChunkDecoder, open_delta_stream};
use crate::error::EngineError;
use crate::stream::DeltaStream;
use crate::types::{ChatMessage, ToolDeclaration, ToolSpec};

/// Contract the orchestrator uses to open generation streams.
///
/// The production implementation is [`GenerationGateway`]; tests substitute
/// scripted streams.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Open a streaming completion.
    ///
    /// The request carries one system message (when given), then `messages`
    /// in order, then `tools` converted to the upstream declaration shape.
    /// Dropping the returned stream abandons the response body.
    async fn stream_chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
        tools: Option<&[ToolSpec]>,
    ) -> Result<DeltaStream, EngineError>;
}

/// HTTP client for `POST {base}/chat/completions` with `stream: true`.
pub struct GenerationGateway {
    client: reqwest::Client,
    config: GenerationConfig,
    decoder: ChunkDecoder,
}

impl GenerationGateway {
    pub fn new(client: reqwest::Client, config: GenerationConfig) -> Self {
        Self {
            client,
            config,
            decoder: ChunkDecoder::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl GenerationBackend for GenerationGateway {
    async fn stream_chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
        tools: Option<&[ToolSpec]>,
    ) -> Result<DeltaStream, EngineError> {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = system_prompt {
            wire_messages.push(ChatMessage::system(prompt));
        }
        wire_messages.extend_from_slice(messages);

        let message_count = wire_messages.len();
        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": wire_messages,
            "stream": true,
        });
        if let Some(specs) = tools.filter(|specs| !specs.is_empty()) {
            let declarations: Vec<ToolDeclaration> =
                specs.iter().map(ToolDeclaration::from).collect();
            body["tools"] = serde_json::to_value(declarations)?;
        }

        tracing::debug!(
            model = %self.config.model,
            messages = message_count,
            "opening generation stream"
        );

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body);

        open_delta_stream(request, self.decoder.clone()).await
    }
}
