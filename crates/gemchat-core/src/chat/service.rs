//! Chat service orchestrating session and message persistence.
//!
//! ChatService wraps a `ChatRepository` and applies the one piece of business
//! logic the store itself does not know about: a session's title is set from
//! its first message once the session holds exactly two messages.

use gemchat_types::chat::{ChatMessage, ChatSession, Sender, SessionSummary};
use gemchat_types::error::RepositoryError;
use tracing::{debug, info};

use super::repository::ChatRepository;
use super::title::derive_title;

/// Message count at which an untitled session receives its title.
const TITLE_AT_MESSAGE_COUNT: u32 = 2;

/// Orchestrates chat session lifecycle and message persistence.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (gemchat-core never depends on gemchat-infra).
pub struct ChatService<C: ChatRepository> {
    chat_repo: C,
}

impl<C: ChatRepository> ChatService<C> {
    /// Create a new chat service with the given repository.
    pub fn new(chat_repo: C) -> Self {
        Self { chat_repo }
    }

    // --- Sessions ---

    /// Register a session by name; an existing name is left as is.
    pub async fn create_session(
        &self,
        name: &str,
        title: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.chat_repo.create_session(name, title).await
    }

    /// Get a session by name.
    pub async fn get_session(&self, name: &str) -> Result<Option<ChatSession>, RepositoryError> {
        self.chat_repo.get_session(name).await
    }

    /// Set a session's title unconditionally.
    pub async fn rename_session(&self, name: &str, title: &str) -> Result<(), RepositoryError> {
        self.chat_repo.rename_session(name, title).await
    }

    /// All sessions, newest first, with their effective display titles.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RepositoryError> {
        let sessions = self.chat_repo.list_sessions().await?;
        Ok(sessions.iter().map(SessionSummary::from).collect())
    }

    // --- Messages ---

    /// Append a message and apply the first-exchange title rule.
    pub async fn append_message(
        &self,
        chat_name: &str,
        sender: Sender,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = self
            .chat_repo
            .append_message(chat_name, sender, text, image_url)
            .await?;
        debug!(chat = %chat_name, sender = %sender, message_id = message.id, "Message stored");

        let count = self.chat_repo.count_messages(chat_name).await?;
        if count == TITLE_AT_MESSAGE_COUNT {
            self.title_from_first_message(chat_name).await?;
        }

        Ok(message)
    }

    /// Messages of a session in insertion order.
    pub async fn list_messages(&self, chat_name: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.chat_repo.list_messages(chat_name).await
    }

    async fn title_from_first_message(&self, chat_name: &str) -> Result<(), RepositoryError> {
        let Some(session) = self.chat_repo.get_session(chat_name).await? else {
            return Ok(());
        };
        if session.title.is_some() {
            return Ok(());
        }

        let messages = self.chat_repo.list_messages(chat_name).await?;
        if let Some(first) = messages.first() {
            let title = derive_title(&first.text);
            self.chat_repo.rename_session(chat_name, &title).await?;
            info!(chat = %chat_name, title = %title, "Session title set");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::Mutex;

    use chrono::Utc;

    /// In-memory `ChatRepository` for service-level tests.
    #[derive(Default)]
    pub(crate) struct InMemoryChatRepository {
        sessions: Mutex<Vec<ChatSession>>,
        messages: Mutex<Vec<ChatMessage>>,
    }

    impl ChatRepository for InMemoryChatRepository {
        async fn create_session(&self, name: &str, title: Option<&str>) -> Result<(), RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            if sessions.iter().all(|s| s.name != name) {
                let id = sessions.len() as i64 + 1;
                sessions.push(ChatSession {
                    id,
                    name: name.to_string(),
                    title: title.map(str::to_string),
                });
            }
            Ok(())
        }

        async fn allocate_session(&self) -> Result<ChatSession, RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let id = sessions.len() as i64 + 1;
            let session = ChatSession {
                id,
                name: format!("chat_{id}.txt"),
                title: None,
            };
            sessions.push(session.clone());
            Ok(session)
        }

        async fn delete_session(&self, name: &str) -> Result<(), RepositoryError> {
            self.sessions.lock().unwrap().retain(|s| s.name != name);
            Ok(())
        }

        async fn get_session(&self, name: &str) -> Result<Option<ChatSession>, RepositoryError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions.iter().find(|s| s.name == name).cloned())
        }

        async fn rename_session(&self, name: &str, title: &str) -> Result<(), RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            if let Some(session) = sessions.iter_mut().find(|s| s.name == name) {
                session.title = Some(title.to_string());
            }
            Ok(())
        }

        async fn list_sessions(&self) -> Result<Vec<ChatSession>, RepositoryError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions.iter().rev().cloned().collect())
        }

        async fn append_message(
            &self,
            chat_name: &str,
            sender: Sender,
            text: &str,
            image_url: Option<&str>,
        ) -> Result<ChatMessage, RepositoryError> {
            let mut messages = self.messages.lock().unwrap();
            let message = ChatMessage {
                id: messages.len() as i64 + 1,
                chat_name: chat_name.to_string(),
                sender,
                text: text.to_string(),
                image_url: image_url.map(str::to_string),
                created_at: Utc::now(),
            };
            messages.push(message.clone());
            Ok(message)
        }

        async fn list_messages(&self, chat_name: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .filter(|m| m.chat_name == chat_name)
                .cloned()
                .collect())
        }

        async fn count_messages(&self, chat_name: &str) -> Result<u32, RepositoryError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages.iter().filter(|m| m.chat_name == chat_name).count() as u32)
        }
    }

    fn service() -> ChatService<InMemoryChatRepository> {
        ChatService::new(InMemoryChatRepository::default())
    }

    #[tokio::test]
    async fn test_title_set_after_first_exchange() {
        let svc = service();
        svc.create_session("chat_1.txt", None).await.unwrap();

        svc.append_message("chat_1.txt", Sender::User, "How do I borrow twice?", None)
            .await
            .unwrap();
        let session = svc.get_session("chat_1.txt").await.unwrap().unwrap();
        assert_eq!(session.title, None);

        svc.append_message("chat_1.txt", Sender::Bot, "You can't, mutably.", None)
            .await
            .unwrap();
        let session = svc.get_session("chat_1.txt").await.unwrap().unwrap();
        assert_eq!(session.title.as_deref(), Some("How do I borrow twice?"));
    }

    #[tokio::test]
    async fn test_title_uses_first_message_regardless_of_sender() {
        let svc = service();
        svc.create_session("chat_1.txt", None).await.unwrap();

        let long = "x".repeat(55);
        svc.append_message("chat_1.txt", Sender::Bot, &long, None)
            .await
            .unwrap();
        svc.append_message("chat_1.txt", Sender::User, "second", None)
            .await
            .unwrap();

        let summaries = svc.list_sessions().await.unwrap();
        assert_eq!(summaries[0].title, format!("{}…", "x".repeat(40)));
    }

    #[tokio::test]
    async fn test_title_not_changed_after_later_messages() {
        let svc = service();
        svc.create_session("chat_1.txt", None).await.unwrap();
        for text in ["first", "reply", "third", "fourth"] {
            svc.append_message("chat_1.txt", Sender::User, text, None)
                .await
                .unwrap();
        }
        let session = svc.get_session("chat_1.txt").await.unwrap().unwrap();
        assert_eq!(session.title.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_explicit_title_is_kept() {
        let svc = service();
        svc.create_session("chat_1.txt", Some("Pinned")).await.unwrap();
        svc.append_message("chat_1.txt", Sender::User, "hello", None)
            .await
            .unwrap();
        svc.append_message("chat_1.txt", Sender::Bot, "hi", None)
            .await
            .unwrap();

        let session = svc.get_session("chat_1.txt").await.unwrap().unwrap();
        assert_eq!(session.title.as_deref(), Some("Pinned"));
    }

    #[tokio::test]
    async fn test_append_to_unregistered_session_still_stores() {
        let svc = service();
        svc.append_message("ghost", Sender::User, "a", None).await.unwrap();
        svc.append_message("ghost", Sender::Bot, "b", None).await.unwrap();

        let messages = svc.list_messages("ghost").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert!(svc.get_session("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sessions_uses_display_title() {
        let svc = service();
        svc.create_session("chat_1.txt", None).await.unwrap();
        svc.create_session("chat_2.txt", Some("Named")).await.unwrap();

        let summaries = svc.list_sessions().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "chat_2.txt");
        assert_eq!(summaries[0].title, "Named");
        assert_eq!(summaries[1].title, "chat_1.txt");
    }
}
