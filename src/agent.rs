use crate::error::{ ChatError, ChatResult };
use crate::history::ConversationStore;
use crate::llm::ResponseGenerator;
use crate::models::chat::{ ChatMessage, Conversation };

use log::{ info, warn, debug };
use std::sync::Arc;
use uuid::Uuid;

/// Length in bytes of a conversation id before hex encoding.
pub const CONVERSATION_ID_BYTES: usize = 8;

/// Draws a fresh conversation id from the OS random source, rendered as lowercase hex.
pub fn new_conversation_id() -> String {
    let raw = Uuid::new_v4().into_bytes();
    // bytes 6 and 8 carry the UUID version/variant bits
    let mut id = [0u8; CONVERSATION_ID_BYTES];
    id[..6].copy_from_slice(&raw[..6]);
    id[6..].copy_from_slice(&raw[10..12]);
    hex::encode(id)
}

/// Owns the conversation lifecycle: creation against the model allow-list,
/// appending turns and asking the generator for replies.
#[derive(Clone)]
pub struct ChatAgent {
    store: Arc<dyn ConversationStore>,
    generator: Arc<dyn ResponseGenerator>,
    available_models: Arc<Vec<String>>,
    default_model: String,
}

impl ChatAgent {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        generator: Arc<dyn ResponseGenerator>,
        available_models: Vec<String>,
        default_model: String
    ) -> Self {
        Self {
            store,
            generator,
            available_models: Arc::new(available_models),
            default_model,
        }
    }

    pub fn available_models(&self) -> &[String] {
        &self.available_models
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn is_available_model(&self, model: &str) -> bool {
        self.available_models.iter().any(|m| m == model)
    }

    /// Starts an empty conversation. `model` falls back to the default model when absent.
    pub async fn start_conversation(
        &self,
        theme: Option<String>,
        model: Option<String>
    ) -> ChatResult<String> {
        let model = model.unwrap_or_else(|| self.default_model.clone());
        if !self.is_available_model(&model) {
            return Err(ChatError::InvalidModel(model));
        }

        let id = new_conversation_id();
        info!("Starting conversation {} (model={}, theme={:?})", id, model, theme);
        self.store.insert(Conversation::new(id.clone(), theme, model)).await?;
        Ok(id)
    }

    /// Appends the user's turn, asks the generator for a reply and appends it.
    ///
    /// If generation fails the user message stays in the transcript with no reply after it.
    pub async fn send_message(&self, conversation_id: &str, message: &str) -> ChatResult<String> {
        let snapshot = self.store.append_message(conversation_id, ChatMessage::user(message)).await?;
        debug!(
            "Conversation {} now holds {} messages, generating with {}",
            conversation_id,
            snapshot.messages.len(),
            self.generator.name()
        );

        let response = match self.generator.generate(&snapshot).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Generation failed for {}; user message kept without reply: {}", conversation_id, e);
                return Err(ChatError::ResponseGeneration(e.to_string()));
            }
        };

        self.store.append_message(conversation_id, ChatMessage::assistant(response.clone())).await?;
        Ok(response)
    }

    pub async fn conversation(&self, conversation_id: &str) -> ChatResult<Conversation> {
        self.store
            .get(conversation_id).await?
            .ok_or_else(|| ChatError::ConversationNotFound(conversation_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryConversationStore;
    use crate::llm::echo::EchoGenerator;
    use crate::models::chat::Role;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::error::Error as StdError;
    use std::time::Duration;

    fn models() -> Vec<String> {
        vec!["model_a".into(), "model_b".into(), "model_c".into()]
    }

    fn agent() -> ChatAgent {
        ChatAgent::new(
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(EchoGenerator::new(Duration::ZERO)),
            models(),
            "model_a".into()
        )
    }

    struct FailingGenerator;

    #[async_trait]
    impl ResponseGenerator for FailingGenerator {
        async fn generate(
            &self,
            _conversation: &Conversation
        ) -> Result<String, Box<dyn StdError + Send + Sync>> {
            Err("backend unavailable".into())
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn conversation_ids_are_sixteen_hex_chars() {
        let id = new_conversation_id();
        assert_eq!(id.len(), CONVERSATION_ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn every_allowed_model_yields_unique_ids() {
        let agent = agent();
        let mut seen = HashSet::new();
        for _ in 0..500 {
            for model in models() {
                let id = agent.start_conversation(None, Some(model)).await.unwrap();
                assert!(seen.insert(id));
            }
        }
        assert_eq!(agent.store().len().await, 1500);
    }

    #[tokio::test]
    async fn missing_model_uses_default() {
        let agent = agent();
        let id = agent.start_conversation(Some("space".into()), None).await.unwrap();
        let conversation = agent.conversation(&id).await.unwrap();
        assert_eq!(conversation.model, "model_a");
        assert_eq!(conversation.theme.as_deref(), Some("space"));
        assert!(conversation.messages.is_empty());
    }

    #[tokio::test]
    async fn unknown_model_is_rejected_without_creating() {
        let agent = agent();
        let err = agent.start_conversation(None, Some("model_z".into())).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidModel(m) if m == "model_z"));
        assert_eq!(agent.store().len().await, 0);
    }

    #[tokio::test]
    async fn send_message_records_user_and_assistant_turns() {
        let agent = agent();
        let id = agent.start_conversation(Some("space".into()), Some("model_a".into())).await.unwrap();

        let reply = agent.send_message(&id, "hi").await.unwrap();
        assert_eq!(reply, "Echo: hi");

        let messages = agent.conversation(&id).await.unwrap().messages;
        let turns: Vec<(Role, &str)> = messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(turns, vec![(Role::User, "hi"), (Role::Assistant, "Echo: hi")]);
    }

    #[tokio::test]
    async fn repeated_text_is_not_deduplicated() {
        let agent = agent();
        let id = agent.start_conversation(None, None).await.unwrap();
        agent.send_message(&id, "same").await.unwrap();
        agent.send_message(&id, "same").await.unwrap();
        assert_eq!(agent.conversation(&id).await.unwrap().messages.len(), 4);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let agent = agent();
        agent.start_conversation(None, None).await.unwrap();

        let err = agent.send_message("deadbeefdeadbeef", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound(_)));
        assert_eq!(agent.store().len().await, 1);
    }

    #[tokio::test]
    async fn generation_failure_keeps_user_message() {
        let agent = ChatAgent::new(
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(FailingGenerator),
            models(),
            "model_a".into()
        );
        let id = agent.start_conversation(None, None).await.unwrap();

        let err = agent.send_message(&id, "hello?").await.unwrap_err();
        assert!(matches!(err, ChatError::ResponseGeneration(ref e) if e.contains("backend unavailable")));

        let messages = agent.conversation(&id).await.unwrap().messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sends_never_lose_messages() {
        let agent = ChatAgent::new(
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(EchoGenerator::new(Duration::from_millis(5))),
            models(),
            "model_a".into()
        );
        let id = agent.start_conversation(None, None).await.unwrap();

        let calls = (0..32).map(|i| {
            let agent = agent.clone();
            let id = id.clone();
            tokio::spawn(async move { agent.send_message(&id, &format!("msg {}", i)).await })
        });
        for result in futures::future::join_all(calls).await {
            assert!(result.unwrap().is_ok());
        }

        let messages = agent.conversation(&id).await.unwrap().messages;
        assert_eq!(messages.len(), 64);
        let users = messages.iter().filter(|m| m.role == Role::User).count();
        assert_eq!(users, 32);
    }
}
