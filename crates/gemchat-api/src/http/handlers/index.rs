//! GET / -- the chat page.

use axum::extract::State;
use axum::response::Html;

use gemchat_types::chat::HistoryEntry;

use crate::http::error::AppError;
use crate::state::AppState;

/// Render the page for the newest session, creating one when none exist.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut chats = state.chat_service.list_sessions().await?;

    let current = match chats.first() {
        Some(chat) => chat.name.clone(),
        None => {
            let name = state.naming.next_chat_file().await?;
            chats = state.chat_service.list_sessions().await?;
            name
        }
    };

    let history: Vec<HistoryEntry> = state
        .chat_service
        .list_messages(&current)
        .await?
        .into_iter()
        .map(HistoryEntry::from)
        .collect();

    let html = state
        .pages
        .index(&chats, &current, &history)
        .map_err(|e| AppError::Internal(format!("failed to render page: {e}")))?;
    Ok(Html(html))
}
