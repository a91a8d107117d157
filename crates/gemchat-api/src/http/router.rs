//! Axum router configuration with middleware.
//!
//! Routes mirror the browser client's fetch calls. Uploaded files are served
//! from the upload directory under `/uploads/`; the page's JS and CSS are
//! compiled into the binary and served under `/static/`.

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::handlers::upload::MAX_UPLOAD_BYTES;
use crate::http::page;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.layout.upload_dir);

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/get", post(handlers::chat::get_response))
        .route(
            "/upload_image",
            post(handlers::upload::upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/get_chats", get(handlers::chat::get_chats))
        .route("/load_chat", post(handlers::chat::load_chat))
        .route("/new_chat", post(handlers::chat::new_chat))
        .route("/static/chat.js", get(page::chat_js))
        .route("/static/style.css", get(page::style_css))
        .route("/health", get(health_check))
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus database reachability and gateway mode.
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let database = match state.db_pool.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };
    axum::Json(serde_json::json!({
        "status": if database { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "gemini": if state.gateway.is_offline() { "offline" } else { "online" },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use gemchat_types::config::{AppConfig, GeminiConfig};

    use crate::state::build_gateway;

    async fn test_app() -> (Router, AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_gateway(
            dir.path().to_path_buf(),
            &AppConfig::default(),
            build_gateway(&GeminiConfig::default(), None),
        )
        .await
        .unwrap();
        (build_router(state.clone()), state, dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn multipart_request(filename: &str, contents: &[u8]) -> Request<Body> {
        let boundary = "gemchat-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload_image")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn dir_entries(path: &std::path::Path) -> usize {
        std::fs::read_dir(path).unwrap().count()
    }

    #[tokio::test]
    async fn test_get_without_chat_creates_session() {
        let (app, _state, _dir) = test_app().await;

        let (status, body) =
            send_json(&app, "POST", "/get", Some(serde_json::json!({"msg": "hi"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "(offline) hi");
        assert_eq!(body["chat_name"], "chat_1.txt");

        let (_, chats) = send_json(&app, "GET", "/get_chats", None).await;
        assert_eq!(chats, serde_json::json!([{"name": "chat_1.txt", "title": "hi"}]));

        let (_, loaded) = send_json(
            &app,
            "POST",
            "/load_chat",
            Some(serde_json::json!({"chat": "chat_1.txt"})),
        )
        .await;
        assert_eq!(
            loaded,
            serde_json::json!({"history": [
                {"sender": "user", "text": "hi", "image_url": null},
                {"sender": "bot", "text": "(offline) hi", "image_url": null}
            ]})
        );
    }

    #[tokio::test]
    async fn test_get_with_unknown_chat_registers_it() {
        let (app, _state, _dir) = test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/get",
            Some(serde_json::json!({"chat": "my-chat", "msg": "hello there"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chat_name"], "my-chat");

        let (_, chats) = send_json(&app, "GET", "/get_chats", None).await;
        assert_eq!(chats[0]["name"], "my-chat");
        assert_eq!(chats[0]["title"], "hello there");
    }

    #[tokio::test]
    async fn test_get_missing_msg_defaults_to_empty() {
        let (app, _state, _dir) = test_app().await;

        let (status, body) = send_json(&app, "POST", "/get", Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "(offline) ");
    }

    #[tokio::test]
    async fn test_get_malformed_json_is_bad_request() {
        let (app, _state, _dir) = test_app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/get")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_load_unknown_or_missing_chat_is_empty() {
        let (app, _state, _dir) = test_app().await;

        let (status, body) = send_json(
            &app,
            "POST",
            "/load_chat",
            Some(serde_json::json!({"chat": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"history": []}));

        let (status, body) = send_json(&app, "POST", "/load_chat", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"history": []}));
    }

    #[tokio::test]
    async fn test_new_chat_names_are_sequential() {
        let (app, state, _dir) = test_app().await;

        let (_, first) = send_json(&app, "POST", "/new_chat", None).await;
        let (_, second) = send_json(&app, "POST", "/new_chat", None).await;
        assert_eq!(first, serde_json::json!({"new_chat": "chat_1.txt"}));
        assert_eq!(second, serde_json::json!({"new_chat": "chat_2.txt"}));

        assert!(state.layout.chat_dir.join("chat_1.txt").is_file());
        assert!(state.layout.chat_dir.join("chat_2.txt").is_file());

        let (_, chats) = send_json(&app, "GET", "/get_chats", None).await;
        assert_eq!(chats[0]["name"], "chat_2.txt");
        assert_eq!(chats[1]["title"], "chat_1.txt");
    }

    #[tokio::test]
    async fn test_new_chat_failure_leaves_no_session() {
        let (app, state, _dir) = test_app().await;

        std::fs::remove_dir_all(&state.layout.chat_dir).unwrap();
        std::fs::write(&state.layout.chat_dir, b"not a directory").unwrap();

        let (status, body) = send_json(&app, "POST", "/new_chat", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (_, chats) = send_json(&app, "GET", "/get_chats", None).await;
        assert_eq!(chats, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_extension() {
        let (app, state, _dir) = test_app().await;

        let (status, bytes) = send(&app, multipart_request("photo.bmp", b"BM")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "unsupported image format: 'bmp'");
        assert_eq!(dir_entries(&state.layout.upload_dir), 0);
    }

    #[tokio::test]
    async fn test_upload_name_without_dot_is_rejected() {
        let (app, state, _dir) = test_app().await;

        let (status, bytes) = send(&app, multipart_request("png", b"x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "unsupported image format: 'png'");
        assert_eq!(dir_entries(&state.layout.upload_dir), 0);
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let (app, _state, _dir) = test_app().await;
        let png = b"\x89PNG\r\n\x1a\nfake-image-bytes";

        let (status, bytes) = send(&app, multipart_request("photo.png", png)).await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let url = body["image_url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_photo.png"));

        let request = Request::builder().uri(&url).body(Body::empty()).unwrap();
        let (status, served) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(served, png.to_vec());
    }

    #[tokio::test]
    async fn test_upload_without_image_field() {
        let (app, _state, _dir) = test_app().await;

        let boundary = "b";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload_image")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "no file in field 'image'");
    }

    #[tokio::test]
    async fn test_message_with_uploaded_image_keeps_url() {
        let (app, _state, _dir) = test_app().await;

        let (_, bytes) = send(&app, multipart_request("cat.jpg", b"jpeg")).await;
        let upload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let url = upload["image_url"].clone();

        let (status, body) = send_json(
            &app,
            "POST",
            "/get",
            Some(serde_json::json!({"msg": "what is this", "image_url": url})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, loaded) = send_json(
            &app,
            "POST",
            "/load_chat",
            Some(serde_json::json!({"chat": body["chat_name"]})),
        )
        .await;
        assert_eq!(loaded["history"][0]["image_url"], url);
        assert_eq!(loaded["history"][1]["image_url"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_missing_upload_is_not_found() {
        let (app, _state, _dir) = test_app().await;

        let request = Request::builder()
            .uri("/uploads/missing.png")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_creates_first_chat() {
        let (app, _state, _dir) = test_app().await;

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains(r#"data-current-chat="chat_1.txt""#));

        // A second visit reuses the newest chat.
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        send(&app, request).await;
        let (_, chats) = send_json(&app, "GET", "/get_chats", None).await;
        assert_eq!(chats.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_static_assets_and_health() {
        let (app, _state, _dir) = test_app().await;

        let request = Request::builder()
            .uri("/static/chat.js")
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains("/upload_image"));

        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["gemini"], "offline");
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let (app, state, _dir) = test_app().await;
        state.db_pool.reader.close().await;

        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], false);
    }
}
