//! Server-rendered index page and embedded static assets.

use axum::http::header;
use axum::response::IntoResponse;
use minijinja::{Environment, context};

use gemchat_types::chat::{HistoryEntry, SessionSummary};

const INDEX_TEMPLATE: &str = include_str!("../../assets/templates/index.html");
const CHAT_JS: &str = include_str!("../../assets/static/chat.js");
const STYLE_CSS: &str = include_str!("../../assets/static/style.css");

/// Renders the single HTML page with minijinja (HTML auto-escaping on).
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the index page for `current` with the sidebar list and its history.
    pub fn index(
        &self,
        chats: &[SessionSummary],
        current: &str,
        history: &[HistoryEntry],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {
            chats => chats,
            current => current,
            history => history,
        })
    }
}

/// GET /static/chat.js
pub async fn chat_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        CHAT_JS,
    )
}

/// GET /static/style.css
pub async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}
