//! ChatRepository trait definition.
//!
//! Provides CRUD operations for chat sessions and messages. Sessions are
//! keyed by name; messages reference their session by that name.

use gemchat_types::chat::{ChatMessage, ChatSession, Sender};
use gemchat_types::error::RepositoryError;

/// Repository trait for chat session and message persistence.
///
/// Implementations live in gemchat-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Insert a session if no session with this name exists.
    ///
    /// An existing name is left untouched and is not an error.
    fn create_session(
        &self,
        name: &str,
        title: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert a new session named after its own row id (`chat_<id>.txt`).
    fn allocate_session(
        &self,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Remove a session row. Its messages, if any, are left in place.
    fn delete_session(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a session by name.
    fn get_session(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Set a session's title. Unknown names are a no-op.
    fn rename_session(
        &self,
        name: &str,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List all sessions, newest-created first.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Append a message to a session and return the stored row.
    ///
    /// The session does not need to exist.
    fn append_message(
        &self,
        chat_name: &str,
        sender: Sender,
        text: &str,
        image_url: Option<&str>,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Messages of a session in insertion order. Unknown names yield an empty list.
    fn list_messages(
        &self,
        chat_name: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Number of messages stored for a session.
    fn count_messages(
        &self,
        chat_name: &str,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
