//! Chat session and message types for gemchat.
//!
//! A session is one chat thread keyed by a unique name; messages belong to
//! exactly one session and are ordered by insertion sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a message.
///
/// Stored as the lowercase strings `user` and `bot` in the `messages.sender`
/// column and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A chat session.
///
/// `title` stays `None` until the first exchange completes; use
/// [`ChatSession::display_title`] for what the client should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
}

impl ChatSession {
    /// The title if one has been set, otherwise the session name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Session entry as listed to the client: name plus effective title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub name: String,
    pub title: String,
}

impl From<&ChatSession> for SessionSummary {
    fn from(session: &ChatSession) -> Self {
        Self {
            name: session.name.clone(),
            title: session.display_title().to_string(),
        }
    }
}

/// A single message within a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat_name: String,
    pub sender: Sender,
    pub text: String,
    /// `/uploads/...` URL of an attached image, if any.
    pub image_url: Option<String>,
    /// Assigned by the store on insert.
    pub created_at: DateTime<Utc>,
}

/// Message shape returned by `/load_chat` and rendered into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub text: String,
    pub image_url: Option<String>,
}

impl From<ChatMessage> for HistoryEntry {
    fn from(message: ChatMessage) -> Self {
        Self {
            sender: message.sender,
            text: message.text,
            image_url: message.image_url,
        }
    }
}
