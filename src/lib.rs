//! # Fabchat - Streaming Tool-Orchestration Engine
//!
//! Fabchat turns one user message into one streamed assistant answer over an
//! OpenAI-compatible chat upstream and an HTTP tool server. It owns the full
//! turn: history replay, stream decoding, tool-call assembly and execution,
//! resumed generation with the results, persistence, and a typed event stream
//! for the serving layer.
//!
//! ## Features
//!
//! - **Typed turn events**: content deltas, chart artifacts, and exactly one
//!   terminal event per turn
//! - **Tool round trips**: streamed tool-call fragments are reassembled,
//!   executed, and folded back into the conversation automatically
//! - **Degraded discovery**: when the tool server is unreachable, a built-in
//!   catalogue keeps the model's tool surface stable
//! - **Pluggable seams**: generation, tool execution, and storage are traits,
//!   so services swap in their own backends and tests script the stream
//! - **Server adapters**: SSE framing helpers, with an Axum response adapter
//!   behind the `server-adapters` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fabchat::config::{EngineConfig, build_http_clients};
//! use fabchat::gateway::{GenerationGateway, ToolGateway};
//! use fabchat::orchestrator::{ChatOrchestrator, TurnOptions};
//! use fabchat::store::MemoryStore;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fabchat::error::EngineError> {
//!     fabchat::telemetry::init_tracing_from_env()?;
//!
//!     let config = EngineConfig::from_env()?;
//!     let (generation_client, tool_client) = build_http_clients(&config)?;
//!
//!     let orchestrator = ChatOrchestrator::new(
//!         Arc::new(GenerationGateway::new(generation_client, config.generation)),
//!         Arc::new(ToolGateway::new(tool_client, config.tools)),
//!         Arc::new(MemoryStore::new()),
//!         TurnOptions::default(),
//!     );
//!
//!     let conversation = orchestrator.ensure_conversation("user-1", None).await?;
//!     let handle = orchestrator.stream_turn(&conversation.id, "CVD 장비 온도 보여줘");
//!     let mut stream = handle.stream;
//!     while let Some(event) = stream.next().await {
//!         println!("{}", serde_json::to_string(&event)?);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod assemble;
pub mod config;
pub mod decode;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod prompt;
pub mod server_adapters;
pub mod store;
pub mod stream;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use error::EngineError;
pub use orchestrator::{ChatOrchestrator, TurnOptions};
pub use stream::{TurnHandle, TurnStream};
pub use types::TurnEvent;

/// Everything a service embedding the engine usually needs.
pub mod prelude {
    pub use crate::config::{EngineConfig, GenerationConfig, ToolGatewayConfig, build_http_clients};
    pub use crate::error::EngineError;
    pub use crate::gateway::{GenerationBackend, GenerationGateway, ToolExecutor, ToolGateway};
    pub use crate::orchestrator::{ChatOrchestrator, TurnOptions};
    pub use crate::prompt::DEFAULT_SYSTEM_PROMPT;
    pub use crate::server_adapters::{SseOptions, sse_frames};
    pub use crate::store::{ConversationStore, MemoryStore};
    pub use crate::stream::{TurnHandle, TurnStream};
    pub use crate::telemetry::init_tracing_from_env;
    pub use crate::types::{ChatMessage, Conversation, MessageRole, StoredMessage, TurnEvent};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn message_constructors_set_roles() {
        let user_msg = ChatMessage::user("안녕하세요");
        assert_eq!(user_msg.role, MessageRole::User);
        assert_eq!(user_msg.content_text(), Some("안녕하세요"));

        let system_msg = ChatMessage::system("당신은 어시스턴트입니다");
        assert_eq!(system_msg.role, MessageRole::System);
    }

    #[test]
    fn prelude_exposes_config_builders() {
        let generation = GenerationConfig::new("http://localhost:9000/v1", "key", "gpt-4o");
        let tools = ToolGatewayConfig::new("http://localhost:8001");
        let config = EngineConfig { generation, tools };
        let _clients = build_http_clients(&config).unwrap();
    }
}
