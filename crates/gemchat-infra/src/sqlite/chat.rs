//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `gemchat-core` using sqlx with split read/write pools:
//! raw queries, private Row structs, reads on the reader pool and writes on the writer.

use chrono::{DateTime, NaiveDateTime, Utc};
use gemchat_core::chat::repository::ChatRepository;
use gemchat_types::chat::{ChatMessage, ChatSession, Sender};
use gemchat_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

const SESSION_COLUMNS: &str = "id, name, title";

// `timestamp` is cast so it decodes as plain text regardless of the declared type.
const MESSAGE_COLUMNS: &str =
    "id, chat_name, sender, text, image_url, CAST(timestamp AS TEXT) AS timestamp";

struct ChatSessionRow {
    id: i64,
    name: String,
    title: Option<String>,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            title: row.try_get("title")?,
        })
    }

    fn into_session(self) -> ChatSession {
        ChatSession {
            id: self.id,
            name: self.name,
            title: self.title,
        }
    }
}

struct ChatMessageRow {
    id: i64,
    chat_name: String,
    sender: String,
    text: String,
    image_url: Option<String>,
    timestamp: Option<String>,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_name: row.try_get("chat_name")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            image_url: row.try_get("image_url")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = match self.timestamp.as_deref() {
            Some(ts) => parse_timestamp(ts)?,
            None => Utc::now(),
        };

        Ok(ChatMessage {
            id: self.id,
            chat_name: self.chat_name,
            sender,
            text: self.text,
            image_url: self.image_url,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse SQLite's `CURRENT_TIMESTAMP` format (UTC, second precision).
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Query(format!("invalid timestamp '{s}': {e}")))
}

fn session_name_for(id: i64) -> String {
    format!("chat_{id}.txt")
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, name: &str, title: Option<&str>) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR IGNORE INTO chats (name, title) VALUES (?, ?)")
            .bind(name)
            .bind(title)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn allocate_session(&self) -> Result<ChatSession, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        // A client may already have registered a name like `chat_7.txt` by hand.
        // Skip over such ids; AUTOINCREMENT never hands a deleted id out again.
        let session = loop {
            let id = sqlx::query("INSERT INTO chats (name, title) VALUES (NULL, NULL)")
                .execute(&mut *tx)
                .await
                .map_err(query_err)?
                .last_insert_rowid();
            let name = session_name_for(id);

            let taken = sqlx::query("SELECT 1 FROM chats WHERE name = ?")
                .bind(&name)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?
                .is_some();

            if taken {
                sqlx::query("DELETE FROM chats WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(query_err)?;
                continue;
            }

            sqlx::query("UPDATE chats SET name = ? WHERE id = ?")
                .bind(&name)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(query_err)?;

            break ChatSession {
                id,
                name,
                title: None,
            };
        };

        tx.commit().await.map_err(query_err)?;
        Ok(session)
    }

    async fn delete_session(&self, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM chats WHERE name = ?")
            .bind(name)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn get_session(&self, name: &str) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {SESSION_COLUMNS} FROM chats WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row).map_err(query_err)?;
                Ok(Some(session_row.into_session()))
            }
            None => Ok(None),
        }
    }

    async fn rename_session(&self, name: &str, title: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE chats SET title = ? WHERE name = ?")
            .bind(title)
            .bind(name)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM chats WHERE name IS NOT NULL ORDER BY id DESC"
        ))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row = ChatSessionRow::from_row(row).map_err(query_err)?;
            sessions.push(session_row.into_session());
        }

        Ok(sessions)
    }

    async fn append_message(
        &self,
        chat_name: &str,
        sender: Sender,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<ChatMessage, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO messages (chat_name, sender, text, image_url) VALUES (?, ?, ?, ?) \
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(chat_name)
        .bind(sender.to_string())
        .bind(text)
        .bind(image_url)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(query_err)?;

        ChatMessageRow::from_row(&row)
            .map_err(query_err)?
            .into_message()
    }

    async fn list_messages(&self, chat_name: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE chat_name = ? ORDER BY id ASC"
        ))
        .bind(chat_name)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = ChatMessageRow::from_row(row).map_err(query_err)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn count_messages(&self, chat_name: &str) -> Result<u32, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM messages WHERE chat_name = ?")
            .bind(chat_name)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let count: i64 = row.try_get("cnt").map_err(query_err)?;
        Ok(count as u32)
    }
}
