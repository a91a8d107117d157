//! Chat JSON endpoints.
//!
//! - POST /get        - store a message, ask the gateway, store and return the reply
//! - GET  /get_chats  - list sessions, newest first
//! - POST /load_chat  - history of one session
//! - POST /new_chat   - allocate a fresh session

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use gemchat_types::chat::{HistoryEntry, Sender, SessionSummary};

use super::body_or_default;
use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for `/get`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct GetRequest {
    #[serde(default)]
    pub chat: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetResponse {
    pub response: String,
    pub chat_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadChatRequest {
    #[serde(default)]
    pub chat: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadChatResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewChatResponse {
    pub new_chat: String,
}

/// POST /get
///
/// The user message is stored before the gateway is called and the reply is
/// stored before the response is sent.
pub async fn get_response(
    State(state): State<AppState>,
    payload: Result<Json<GetRequest>, JsonRejection>,
) -> Result<Json<GetResponse>, AppError> {
    let req = body_or_default(payload)?;

    let chat_name = match req.chat.filter(|c| !c.is_empty()) {
        Some(name) => {
            state.chat_service.create_session(&name, None).await?;
            name
        }
        None => state.naming.next_chat_file().await?,
    };
    let msg = req.msg.unwrap_or_default();
    let image_url = req.image_url.filter(|u| !u.is_empty());
    let image_path = image_url
        .as_deref()
        .and_then(|url| state.uploads.resolve_url(url));

    state
        .chat_service
        .append_message(&chat_name, Sender::User, &msg, image_url.as_deref())
        .await?;

    let response = state.gateway.ask(&msg, image_path.as_deref()).await;
    debug!(chat = %chat_name, has_image = image_path.is_some(), "Reply ready");

    state
        .chat_service
        .append_message(&chat_name, Sender::Bot, &response, None)
        .await?;

    Ok(Json(GetResponse {
        response,
        chat_name,
    }))
}

/// GET /get_chats
pub async fn get_chats(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    Ok(Json(state.chat_service.list_sessions().await?))
}

/// POST /load_chat
///
/// A missing or unknown chat yields an empty history.
pub async fn load_chat(
    State(state): State<AppState>,
    payload: Result<Json<LoadChatRequest>, JsonRejection>,
) -> Result<Json<LoadChatResponse>, AppError> {
    let req = body_or_default(payload)?;

    let history = match req.chat.filter(|c| !c.is_empty()) {
        Some(chat) => state
            .chat_service
            .list_messages(&chat)
            .await?
            .into_iter()
            .map(HistoryEntry::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(Json(LoadChatResponse { history }))
}

/// POST /new_chat
pub async fn new_chat(State(state): State<AppState>) -> Result<Json<NewChatResponse>, AppError> {
    let new_chat = state.naming.next_chat_file().await?;
    Ok(Json(NewChatResponse { new_chat }))
}
