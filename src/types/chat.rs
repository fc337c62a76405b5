//! Chat message and conversation types.
//!
//! [`ChatMessage`] is the upstream wire shape: a plain role/content pair,
//! optionally carrying tool-call declarations (assistant side) or a
//! `tool_call_id` (tool side). [`StoredMessage`] and [`Conversation`] are the
//! persisted shapes owned by the conversation store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::tools::ToolCall;

/// Title given to a conversation before the first exchange names it.
pub const DEFAULT_CONVERSATION_TITLE: &str = "새 대화";

/// Message role in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
}

/// One message in the upstream request format.
///
/// `content` serializes as `null` (not omitted) when absent, which is what
/// assistant tool-call declarations carry on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a tool-result message bound to a prior call id.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Create the assistant message that declares executed tool calls in a
    /// continuation request. Content is deliberately `null` on the wire.
    pub fn tool_call_declaration(calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// Text content of the message, if any.
    pub fn content_text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// A conversation as the store sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted message, including the optional chart artifact attached to
/// assistant messages that produced a visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Project the stored message into the upstream request shape.
    ///
    /// History is replayed as plain role/content pairs; tool exchanges are
    /// not persisted, so nothing else has to be carried over.
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: Some(self.content.clone()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}
