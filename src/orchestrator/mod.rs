//! Turn orchestration: history, generation streaming, tool execution.
//!
//! One turn is one user message answered end to end: load recent history,
//! stream the model's reply, execute any requested tools, resume generation
//! with the results, persist the final assistant message, and emit the
//! terminal event. Each turn runs as its own tokio task writing into a
//! bounded channel; the caller consumes a [`TurnHandle`].

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::assemble::ToolCallAssembler;
use crate::error::EngineError;
use crate::gateway::catalogue::CHART_TOOL_NAME;
use crate::gateway::{DiscoverySource, GenerationBackend, ToolExecutor};
use crate::prompt::{DEFAULT_SYSTEM_PROMPT, derive_title};
use crate::store::ConversationStore;
use crate::stream::{TurnHandle, TurnStream};
use crate::types::{
    ChatMessage, Conversation, FinishReason, MessageRole, StreamDelta, ToolCall, TurnEvent,
};
use crate::utils::cancel::{CancelHandle, make_cancellable_stream, new_cancel_handle};

/// How many history messages are replayed into each request.
const HISTORY_WINDOW: usize = 20;

/// Capacity of the per-turn event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Options governing one orchestrator instance.
pub struct TurnOptions {
    /// System prompt prepended to every request.
    pub system_prompt: String,
    /// How many tool-call resume cycles one turn may perform. Zero means
    /// tool calls always fail the turn.
    pub max_continuations: usize,
    /// Bound on the gap between consecutive stream reads.
    pub stream_read_timeout: Duration,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_continuations: 8,
            stream_read_timeout: Duration::from_secs(120),
        }
    }
}

/// Streams assistant turns for stored conversations.
///
/// Collaborators are injected once at construction; the orchestrator holds
/// no other state, so one instance serves any number of concurrent turns.
pub struct ChatOrchestrator {
    generation: Arc<dyn GenerationBackend>,
    tools: Arc<dyn ToolExecutor>,
    store: Arc<dyn ConversationStore>,
    options: TurnOptions,
}

impl ChatOrchestrator {
    pub fn new(
        generation: Arc<dyn GenerationBackend>,
        tools: Arc<dyn ToolExecutor>,
        store: Arc<dyn ConversationStore>,
        options: TurnOptions,
    ) -> Self {
        Self {
            generation,
            tools,
            store,
            options,
        }
    }

    /// Return the requested conversation if it exists and belongs to the
    /// user; otherwise create a fresh one.
    pub async fn ensure_conversation(
        &self,
        user_id: &str,
        requested: Option<&str>,
    ) -> Result<Conversation, EngineError> {
        if let Some(id) = requested {
            if let Some(conversation) = self.store.conversation(id).await? {
                if conversation.user_id == user_id {
                    return Ok(conversation);
                }
            }
        }
        self.store.create_conversation(user_id).await
    }

    /// Start one assistant turn and return its event stream.
    ///
    /// The turn runs on its own task; dropping the stream or cancelling the
    /// handle makes the task stop at the next suspension point without
    /// emitting further events.
    pub fn stream_turn(&self, conversation_id: &str, user_message: &str) -> TurnHandle {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = new_cancel_handle();
        let worker = TurnWorker {
            generation: self.generation.clone(),
            tools: self.tools.clone(),
            store: self.store.clone(),
            system_prompt: self.options.system_prompt.clone(),
            max_continuations: self.options.max_continuations,
            stream_read_timeout: self.options.stream_read_timeout,
            conversation_id: conversation_id.to_string(),
            user_message: user_message.to_string(),
            cancel: cancel.clone(),
            sender,
        };
        tokio::spawn(async move { worker.run().await });
        TurnHandle {
            stream: TurnStream::new(receiver),
            cancel,
        }
    }
}

/// How a turn task ended, short of a fatal error.
enum TurnFlow {
    /// The turn ran to completion and was persisted.
    Completed,
    /// The caller cancelled or went away; no terminal event is owed.
    Detached,
}

struct TurnWorker {
    generation: Arc<dyn GenerationBackend>,
    tools: Arc<dyn ToolExecutor>,
    store: Arc<dyn ConversationStore>,
    system_prompt: String,
    max_continuations: usize,
    stream_read_timeout: Duration,
    conversation_id: String,
    user_message: String,
    cancel: CancelHandle,
    sender: mpsc::Sender<TurnEvent>,
}

impl TurnWorker {
    async fn run(self) {
        tracing::info!(conversation_id = %self.conversation_id, "starting assistant turn");
        match self.drive().await {
            Ok(TurnFlow::Completed) => {
                let _ = self
                    .sender
                    .send(TurnEvent::Done {
                        conversation_id: self.conversation_id.clone(),
                    })
                    .await;
            }
            Ok(TurnFlow::Detached) => {
                tracing::debug!(conversation_id = %self.conversation_id, "turn detached");
            }
            Err(e) => {
                tracing::error!(conversation_id = %self.conversation_id, error = %e, "turn failed");
                let _ = self
                    .sender
                    .send(TurnEvent::Error {
                        error: e.user_message(),
                    })
                    .await;
            }
        }
    }

    async fn drive(&self) -> Result<TurnFlow, EngineError> {
        let history = self
            .store
            .recent_messages(&self.conversation_id, HISTORY_WINDOW)
            .await?;
        self.store
            .append_message(&self.conversation_id, MessageRole::User, &self.user_message, None)
            .await?;

        let discovery = self.tools.discover().await;
        tracing::debug!(
            conversation_id = %self.conversation_id,
            tools = discovery.specs.len(),
            degraded = discovery.source == DiscoverySource::BuiltIn,
            "tool catalogue ready"
        );

        let mut messages: Vec<ChatMessage> =
            history.iter().map(|m| m.to_chat_message()).collect();
        messages.push(ChatMessage::user(self.user_message.clone()));

        let mut full_response = String::new();
        let mut chart_data: Option<Value> = None;
        let mut continuations = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(TurnFlow::Detached);
            }

            let raw = self
                .generation
                .stream_chat(
                    Some(&self.system_prompt),
                    &messages,
                    Some(discovery.specs.as_slice()),
                )
                .await?;
            let (mut stream, stream_cancel) = make_cancellable_stream(raw);

            let mut assembler = ToolCallAssembler::new();
            let mut finished_for_tools = false;

            loop {
                let item =
                    match tokio::time::timeout(self.stream_read_timeout, stream.next()).await {
                        Ok(item) => item,
                        Err(_) => {
                            return Err(EngineError::TimeoutError(format!(
                                "no stream data within {}s",
                                self.stream_read_timeout.as_secs()
                            )));
                        }
                    };
                let Some(item) = item else { break };
                if self.cancel.is_cancelled() {
                    stream_cancel.cancel();
                    return Ok(TurnFlow::Detached);
                }
                match item? {
                    StreamDelta::Content(text) => {
                        full_response.push_str(&text);
                        if self
                            .sender
                            .send(TurnEvent::Content { content: text })
                            .await
                            .is_err()
                        {
                            stream_cancel.cancel();
                            return Ok(TurnFlow::Detached);
                        }
                    }
                    StreamDelta::ToolCall {
                        slot_index,
                        name,
                        arguments,
                    } => {
                        assembler.ingest(slot_index, name.as_deref(), &arguments);
                    }
                    StreamDelta::Finish(reason) => {
                        if reason == FinishReason::ToolCalls {
                            finished_for_tools = true;
                        }
                    }
                }
            }

            let completed = if finished_for_tools {
                assembler.flush()
            } else {
                Vec::new()
            };
            if completed.is_empty() {
                break;
            }

            continuations += 1;
            if continuations > self.max_continuations {
                return Err(EngineError::InternalError(format!(
                    "tool continuation limit ({}) reached",
                    self.max_continuations
                )));
            }

            let mut declared = Vec::with_capacity(completed.len());
            let mut tool_messages = Vec::with_capacity(completed.len());
            for (position, call) in completed.iter().enumerate() {
                if self.cancel.is_cancelled() {
                    return Ok(TurnFlow::Detached);
                }
                tracing::info!(
                    conversation_id = %self.conversation_id,
                    tool = %call.name,
                    "executing tool"
                );
                let result = self
                    .tools
                    .execute(&call.name, call.arguments.clone())
                    .await
                    .into_value();

                if call.name == CHART_TOOL_NAME && result.get("options").is_some() {
                    chart_data = Some(result.clone());
                    if self
                        .sender
                        .send(TurnEvent::Chart {
                            chart_data: result.clone(),
                        })
                        .await
                        .is_err()
                    {
                        return Ok(TurnFlow::Detached);
                    }
                }

                let call_id = format!("call_{}", position + 1);
                declared.push(ToolCall::function(
                    call_id.clone(),
                    call.name.as_str(),
                    serde_json::to_string(&call.arguments)?,
                ));
                tool_messages.push(ChatMessage::tool(serde_json::to_string(&result)?, call_id));
            }

            messages.push(ChatMessage::tool_call_declaration(declared));
            messages.extend(tool_messages);
        }

        self.store
            .append_message(
                &self.conversation_id,
                MessageRole::Assistant,
                &full_response,
                chart_data,
            )
            .await?;

        // A window of at most one message means this was the conversation's
        // first exchange; name it after the user message.
        if history.len() <= 1 {
            self.store
                .update_title(&self.conversation_id, &derive_title(&self.user_message))
                .await?;
        }

        tracing::info!(
            conversation_id = %self.conversation_id,
            continuations,
            response_chars = full_response.chars().count(),
            "turn completed"
        );
        Ok(TurnFlow::Completed)
    }
}
