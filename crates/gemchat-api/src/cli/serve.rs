//! `gemchat serve` -- run the HTTP server until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use tracing::{info, warn};

use gemchat_infra::llm::test_provider_connection;
use gemchat_types::config::AppConfig;

use crate::http::router::build_router;
use crate::state::AppState;

/// Bind the listener, probe the provider if configured, and serve until shutdown.
pub async fn serve(data_dir: PathBuf, config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::init(data_dir.clone(), &config).await?;
    info!(data_dir = %data_dir.display(), "Using data directory");

    if config.gemini.verify_on_startup {
        if let Some(provider) = state.gateway.provider() {
            match test_provider_connection(provider).await {
                Ok(()) => info!(model = provider.model(), "Gemini connection verified"),
                Err(e) => warn!(error = %e, "Gemini probe failed; replies will carry the provider error"),
            }
        }
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %format!("http://{addr}"), "gemchat listening");

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
