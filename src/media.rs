use crate::error::{ ChatError, ChatResult };
use crate::history::ConversationStore;

use log::info;
use std::path::{ Path, PathBuf };
use std::sync::Arc;

/// Writes uploaded files to `{upload_dir}/{conversation_id}_{filename}`.
/// Uploads are not recorded on the conversation itself.
#[derive(Clone)]
pub struct MediaIngestor {
    store: Arc<dyn ConversationStore>,
    upload_dir: PathBuf,
}

/// Keeps only the final path component so an upload cannot escape the upload directory.
pub fn sanitize_filename(filename: &str) -> ChatResult<String> {
    let normalized = filename.replace('\\', "/");
    let name = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ChatError::InvalidUpload(format!("unusable filename '{}'", filename)));
    }
    Ok(name.to_string())
}

impl MediaIngestor {
    pub fn new(store: Arc<dyn ConversationStore>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn target_path(&self, conversation_id: &str, filename: &str) -> PathBuf {
        self.upload_dir.join(format!("{}_{}", conversation_id, filename))
    }

    pub async fn ingest(
        &self,
        conversation_id: &str,
        filename: &str,
        bytes: &[u8]
    ) -> ChatResult<PathBuf> {
        if !self.store.contains(conversation_id).await? {
            return Err(ChatError::ConversationNotFound(conversation_id.to_string()));
        }
        let filename = sanitize_filename(filename)?;

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.target_path(conversation_id, &filename);
        tokio::fs::write(&path, bytes).await?;

        info!("Stored {} bytes for conversation {} at {}", bytes.len(), conversation_id, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::InMemoryConversationStore;
    use crate::models::chat::Conversation;
    use tempfile::TempDir;

    async fn ingestor_with(conversation_id: &str, dir: &Path) -> MediaIngestor {
        let store = Arc::new(InMemoryConversationStore::new());
        store.insert(Conversation::new(conversation_id.into(), None, "model_a".into())).await.unwrap();
        MediaIngestor::new(store, dir.join("uploads"))
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_filename("photo.png").unwrap(), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.jpg").unwrap(), "cat.jpg");
        assert!(matches!(sanitize_filename(""), Err(ChatError::InvalidUpload(_))));
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("dir/").is_ok());
    }

    #[tokio::test]
    async fn ingest_round_trips_bytes_and_creates_directory() {
        let tmp = TempDir::with_prefix("chat-media").unwrap();
        let ingestor = ingestor_with("abc123", tmp.path()).await;
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

        let path = ingestor.ingest("abc123", "notes.bin", &payload).await.unwrap();
        assert_eq!(path, tmp.path().join("uploads").join("abc123_notes.bin"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn second_upload_with_same_name_overwrites() {
        let tmp = TempDir::with_prefix("chat-media").unwrap();
        let ingestor = ingestor_with("abc123", tmp.path()).await;

        ingestor.ingest("abc123", "a.txt", b"first").await.unwrap();
        let path = ingestor.ingest("abc123", "a.txt", b"second").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn unknown_conversation_writes_nothing() {
        let tmp = TempDir::with_prefix("chat-media").unwrap();
        let ingestor = ingestor_with("abc123", tmp.path()).await;

        let err = ingestor.ingest("nope", "a.txt", b"data").await.unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound(_)));
        assert!(!ingestor.upload_dir().exists());
    }

    #[tokio::test]
    async fn unwritable_directory_is_a_storage_error() {
        let tmp = TempDir::with_prefix("chat-media").unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let store = Arc::new(InMemoryConversationStore::new());
        store.insert(Conversation::new("abc123".into(), None, "model_a".into())).await.unwrap();
        let ingestor = MediaIngestor::new(store, blocker.join("uploads"));

        let err = ingestor.ingest("abc123", "a.txt", b"data").await.unwrap_err();
        assert!(matches!(err, ChatError::Storage(_)));
    }
}
