//! Session name allocation.
//!
//! Names come from the store's auto-increment key (`chat_<id>.txt`), so two
//! allocations never observe the same suffix. Each new session also gets an
//! empty placeholder file of the same name under the chat directory.

use std::path::{Path, PathBuf};

use gemchat_types::error::NamingError;
use tracing::{info, warn};

use super::repository::ChatRepository;
use crate::service::fs::FileSystem;

/// Hands out fresh session names and creates their placeholder files.
pub struct ChatNamingService<C: ChatRepository, F: FileSystem> {
    chat_repo: C,
    fs: F,
    chat_dir: PathBuf,
}

impl<C: ChatRepository, F: FileSystem> ChatNamingService<C, F> {
    pub fn new(chat_repo: C, fs: F, chat_dir: PathBuf) -> Self {
        Self {
            chat_repo,
            fs,
            chat_dir,
        }
    }

    /// Directory holding the per-session placeholder files.
    pub fn chat_dir(&self) -> &Path {
        &self.chat_dir
    }

    /// Register a new session and create its empty placeholder file.
    ///
    /// Returns the session name. If the placeholder cannot be written the
    /// session row is removed again, so a failed allocation never shows up in
    /// the session list.
    pub async fn next_chat_file(&self) -> Result<String, NamingError> {
        let session = self.chat_repo.allocate_session().await?;

        let placeholder = self.chat_dir.join(&session.name);
        if let Err(e) = self.fs.write_file(&placeholder, b"").await {
            warn!(chat = %session.name, error = %e, "Placeholder write failed, dropping session");
            if let Err(cleanup) = self.chat_repo.delete_session(&session.name).await {
                warn!(chat = %session.name, error = %cleanup, "Failed to drop orphaned session");
            }
            return Err(e.into());
        }

        info!(chat = %session.name, "New chat session");
        Ok(session.name)
    }
}
