use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid model selected: {0}")]
    InvalidModel(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("LLM response error: {0}")]
    ResponseGeneration(String),

    #[error("Media upload failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl ChatError {
    /// Client errors are the caller's fault and are logged at warn level.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ChatError::InvalidModel(_) |
                ChatError::ConversationNotFound(_) |
                ChatError::InvalidMessage(_) |
                ChatError::InvalidUpload(_)
        )
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
