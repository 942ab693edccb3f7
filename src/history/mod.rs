mod memory;
use async_trait::async_trait;
use log::info;
use std::error::Error;
use crate::cli::Args;
use crate::error::ChatResult;
use std::sync::Arc;
use crate::models::chat::{ ChatMessage, Conversation };

pub use memory::InMemoryConversationStore;

/// Backing storage for conversations. Every method is atomic on its own;
/// callers get no atomicity across separate calls.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn insert(&self, conversation: Conversation) -> ChatResult<()>;

    async fn get(&self, conversation_id: &str) -> ChatResult<Option<Conversation>>;

    async fn contains(&self, conversation_id: &str) -> ChatResult<bool>;

    /// Appends `message` and returns a snapshot of the conversation including it.
    /// Fails with `ConversationNotFound` without touching anything if the id is unknown.
    async fn append_message(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> ChatResult<Conversation>;

    async fn len(&self) -> usize;
}

pub fn create_conversation_store(
    args: &Args
) -> Result<Arc<dyn ConversationStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(InMemoryConversationStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub fn initialize_conversation_store(
    args: &Args
) -> Result<Arc<dyn ConversationStore>, Box<dyn Error + Send + Sync>> {
    info!("Conversations will be stored in: {}", args.history_type);
    create_conversation_store(args)
}
