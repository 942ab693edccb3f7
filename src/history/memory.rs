use async_trait::async_trait;
use crate::error::{ ChatError, ChatResult };
use crate::history::ConversationStore;
use crate::models::chat::{ ChatMessage, Conversation };
use log::debug;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store. Contents live as long as the value and are lost on restart.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn insert(&self, conversation: Conversation) -> ChatResult<()> {
        let mut conversations = self.conversations.write().await;
        debug!("Storing conversation {}", conversation.id);
        conversations.insert(conversation.id.clone(), conversation);
        Ok(())
    }

    async fn get(&self, conversation_id: &str) -> ChatResult<Option<Conversation>> {
        Ok(self.conversations.read().await.get(conversation_id).cloned())
    }

    async fn contains(&self, conversation_id: &str) -> ChatResult<bool> {
        Ok(self.conversations.read().await.contains_key(conversation_id))
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> ChatResult<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| ChatError::ConversationNotFound(conversation_id.to_string()))?;
        conversation.messages.push(message);
        Ok(conversation.clone())
    }

    async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }
}
