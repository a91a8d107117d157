//! Application state wiring all services together.
//!
//! Services are generic over repository/filesystem traits; AppState pins them
//! to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use gemchat_core::chat::naming::ChatNamingService;
use gemchat_core::chat::service::ChatService;
use gemchat_core::llm::gateway::AiGateway;
use gemchat_core::upload::UploadStore;
use gemchat_infra::filesystem::{DataLayout, LocalFileSystem};
use gemchat_infra::llm::{api_key_from_env, create_gemini_provider};
use gemchat_infra::sqlite::chat::SqliteChatRepository;
use gemchat_infra::sqlite::pool::DatabasePool;
use gemchat_types::config::{AppConfig, GeminiConfig};

use crate::http::page::PageRenderer;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteNamingService = ChatNamingService<SqliteChatRepository, LocalFileSystem>;

pub type ConcreteGateway = AiGateway<LocalFileSystem>;

pub type ConcreteUploadStore = UploadStore<LocalFileSystem>;

/// Shared application state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub naming: Arc<ConcreteNamingService>,
    pub gateway: Arc<ConcreteGateway>,
    pub uploads: Arc<ConcreteUploadStore>,
    pub pages: Arc<PageRenderer>,
    pub layout: Arc<DataLayout>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state with a gateway built from the
    /// environment credential (offline when `GEMINI_API_KEY` is unset).
    pub async fn init(data_dir: PathBuf, config: &AppConfig) -> anyhow::Result<Self> {
        let gateway = build_gateway(&config.gemini, api_key_from_env());
        Self::with_gateway(data_dir, config, gateway).await
    }

    /// Initialize the application state around an already-built gateway.
    pub async fn with_gateway(
        data_dir: PathBuf,
        config: &AppConfig,
        gateway: ConcreteGateway,
    ) -> anyhow::Result<Self> {
        let layout = DataLayout::new(&data_dir, &config.storage);
        layout.ensure_dirs(&LocalFileSystem::new()).await?;

        let db_pool = DatabasePool::open(&layout.database).await?;
        info!(path = %layout.database.display(), "Chat history database ready");

        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));
        let naming = ChatNamingService::new(
            SqliteChatRepository::new(db_pool.clone()),
            LocalFileSystem::new(),
            layout.chat_dir.clone(),
        );
        let uploads = UploadStore::new(LocalFileSystem::new(), layout.upload_dir.clone());

        Ok(Self {
            chat_service: Arc::new(chat_service),
            naming: Arc::new(naming),
            gateway: Arc::new(gateway),
            uploads: Arc::new(uploads),
            pages: Arc::new(PageRenderer::new()?),
            layout: Arc::new(layout),
            db_pool,
        })
    }
}

/// Build the AI gateway, falling back to offline mode when there is no
/// credential or the provider cannot be constructed.
pub fn build_gateway(config: &GeminiConfig, api_key: Option<SecretString>) -> ConcreteGateway {
    let fs = LocalFileSystem::new();
    let Some(api_key) = api_key else {
        warn!("GEMINI_API_KEY is not set, replies run in offline mode");
        return AiGateway::offline(fs);
    };

    match create_gemini_provider(config, api_key) {
        Ok(provider) => {
            info!(model = %config.model, "Gemini provider configured");
            AiGateway::new(provider, fs, config.max_output_tokens)
        }
        Err(e) => {
            warn!(error = %e, "Failed to configure Gemini provider, replies run in offline mode");
            AiGateway::offline(fs)
        }
    }
}
