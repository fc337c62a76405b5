//! Conversation persistence.
//!
//! The orchestrator reads history through [`ConversationStore`] and writes
//! back the final assistant message of each turn. [`MemoryStore`] is the
//! bundled implementation; deployments with durable storage implement the
//! trait against their own backend.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::EngineError;
use crate::types::{Conversation, DEFAULT_CONVERSATION_TITLE, MessageRole, StoredMessage};

/// Storage contract for conversations and their messages.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a conversation with the default title.
    async fn create_conversation(&self, user_id: &str) -> Result<Conversation, EngineError>;

    /// Look up a conversation by id.
    async fn conversation(&self, id: &str) -> Result<Option<Conversation>, EngineError>;

    /// Append one message, returning the stored record.
    async fn append_message(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
        chart: Option<Value>,
    ) -> Result<StoredMessage, EngineError>;

    /// The last `limit` messages in chronological order.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, EngineError>;

    /// Replace a conversation's title.
    async fn update_title(&self, conversation_id: &str, title: &str) -> Result<(), EngineError>;
}

#[derive(Default)]
struct MemoryInner {
    conversations: HashMap<String, Conversation>,
    messages: HashMap<String, Vec<StoredMessage>>,
}

/// In-memory store keyed by conversation id.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create_conversation(&self, user_id: &str) -> Result<Conversation, EngineError> {
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: DEFAULT_CONVERSATION_TITLE.to_string(),
            created_at: chrono::Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner
            .conversations
            .insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    async fn conversation(&self, id: &str) -> Result<Option<Conversation>, EngineError> {
        let inner = self.inner.read().await;
        Ok(inner.conversations.get(id).cloned())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
        chart: Option<Value>,
    ) -> Result<StoredMessage, EngineError> {
        let mut inner = self.inner.write().await;
        if !inner.conversations.contains_key(conversation_id) {
            return Err(EngineError::StorageError(format!(
                "unknown conversation {conversation_id}"
            )));
        }
        let message = StoredMessage {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            role,
            content: content.to_string(),
            chart_data: chart,
            created_at: chrono::Utc::now(),
        };
        inner
            .messages
            .entry(conversation_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, EngineError> {
        let inner = self.inner.read().await;
        let Some(messages) = inner.messages.get(conversation_id) else {
            return Ok(Vec::new());
        };
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn update_title(&self, conversation_id: &str, title: &str) -> Result<(), EngineError> {
        let mut inner = self.inner.write().await;
        match inner.conversations.get_mut(conversation_id) {
            Some(conversation) => {
                conversation.title = title.to_string();
                Ok(())
            }
            None => Err(EngineError::StorageError(format!(
                "unknown conversation {conversation_id}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_conversation_gets_default_title() {
        let store = MemoryStore::new();
        let conversation = store.create_conversation("user-1").await.unwrap();
        assert_eq!(conversation.title, "새 대화");
        assert_eq!(conversation.user_id, "user-1");

        let found = store.conversation(&conversation.id).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn recent_messages_returns_chronological_tail() {
        let store = MemoryStore::new();
        let conversation = store.create_conversation("user-1").await.unwrap();
        for i in 0..5 {
            store
                .append_message(&conversation.id, MessageRole::User, &format!("m{i}"), None)
                .await
                .unwrap();
        }

        let tail = store.recent_messages(&conversation.id, 3).await.unwrap();
        let contents: Vec<&str> = tail.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn append_to_unknown_conversation_fails() {
        let store = MemoryStore::new();
        let err = store
            .append_message("nope", MessageRole::User, "hi", None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::StorageError(_)));
    }

    #[tokio::test]
    async fn title_update_replaces_default() {
        let store = MemoryStore::new();
        let conversation = store.create_conversation("user-1").await.unwrap();
        store
            .update_title(&conversation.id, "온도 추이 보여줘")
            .await
            .unwrap();

        let found = store.conversation(&conversation.id).await.unwrap().unwrap();
        assert_eq!(found.title, "온도 추이 보여줘");
    }

    #[tokio::test]
    async fn chart_artifact_is_persisted() {
        let store = MemoryStore::new();
        let conversation = store.create_conversation("user-1").await.unwrap();
        let chart = serde_json::json!({"options": {"series": []}});
        let stored = store
            .append_message(
                &conversation.id,
                MessageRole::Assistant,
                "차트를 생성했습니다",
                Some(chart.clone()),
            )
            .await
            .unwrap();
        assert_eq!(stored.chart_data.unwrap(), chart);
    }
}
