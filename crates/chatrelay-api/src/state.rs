//! Application state wiring the orchestrator to concrete backends.
//!
//! The orchestrator is generic over its store and client; AppState pins it
//! to the boxed wrappers so the backend can be chosen from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use chatrelay_core::chat::box_store::BoxConversationStore;
use chatrelay_core::chat::service::ChatOrchestrator;
use chatrelay_core::llm::box_provider::BoxCompletionClient;
use chatrelay_core::llm::retry::RetryPolicy;
use chatrelay_infra::llm::{api_key_from_env, create_client};
use chatrelay_infra::memory::InMemoryConversationStore;
use chatrelay_infra::sqlite::conversation::SqliteConversationStore;
use chatrelay_infra::sqlite::pool::{DatabasePool, default_database_url};
use chatrelay_types::config::{RelayConfig, StoreBackend, StoreConfig};

pub type ConcreteOrchestrator = ChatOrchestrator<BoxConversationStore, BoxCompletionClient>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(orchestrator: ConcreteOrchestrator, config: RelayConfig, data_dir: PathBuf) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            data_dir,
        }
    }

    /// Resolve the provider key, open the store, and wire the orchestrator.
    pub async fn init(config: RelayConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        let api_key = api_key_from_env(&config.provider).with_context(|| {
            format!(
                "{} is not set; export the completion provider API key",
                config.provider.api_key_env
            )
        })?;
        let client = create_client(&config.provider, api_key)?;
        let store = open_store(&config.store, &data_dir).await?;

        let orchestrator = ChatOrchestrator::new(store, client)
            .with_retry_policy(RetryPolicy::from_config(&config.chat))
            .with_max_message_chars(config.chat.max_message_chars);

        Ok(Self::new(orchestrator, config, data_dir))
    }
}

/// Open the configured conversation store.
pub async fn open_store(config: &StoreConfig, data_dir: &Path) -> anyhow::Result<BoxConversationStore> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; conversations are lost on exit");
            Ok(BoxConversationStore::new(InMemoryConversationStore::new()))
        }
        StoreBackend::Sqlite => {
            tokio::fs::create_dir_all(data_dir)
                .await
                .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

            let url = config
                .database_url
                .clone()
                .unwrap_or_else(|| default_database_url(data_dir));
            let pool = DatabasePool::new(&url)
                .await
                .with_context(|| format!("failed to open database {url}"))?;

            Ok(BoxConversationStore::new(SqliteConversationStore::new(pool)))
        }
    }
}
