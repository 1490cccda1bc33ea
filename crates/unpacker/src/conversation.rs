use std::error::Error as StdError;
use std::path::Path;

use async_trait::async_trait;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Failures that end a request without a reply to the user.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Scratch(#[from] unpacker_fs::Error),

    #[error("message has no document attached")]
    NoDocument,

    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HandlerError {
    pub fn transport(e: impl Into<BoxError>) -> Self {
        Self::Transport(e.into())
    }
}

/// One inbound document and the chat it came from.
///
/// Replies go back to the originating chat.
#[async_trait]
pub trait Conversation: Send + Sync {
    fn user_id(&self) -> Option<u64>;

    /// File name the sender declared for the document, if any.
    fn file_name(&self) -> Option<&str>;

    /// Write the document payload to `path`.
    async fn save_document(&self, path: &Path) -> Result<(), HandlerError>;

    async fn reply(&self, text: &str) -> Result<(), HandlerError>;

    async fn reply_document(&self, path: &Path) -> Result<(), HandlerError>;
}
