//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! `ChatService` is generic over its history repository; AppState pins it to
//! the Dgraph-backed implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use chatgraph_core::chat::service::ChatService;
use chatgraph_infra::config::{load_global_config, resolve_config_path};
use chatgraph_infra::dgraph::client::DgraphClient;
use chatgraph_infra::dgraph::history::DgraphHistoryRepository;
use chatgraph_infra::llm::build_model_registry;
use chatgraph_types::config::GlobalConfig;

pub type ConcreteHistoryRepository = DgraphHistoryRepository<Arc<DgraphClient>>;

pub type ConcreteChatService = ChatService<ConcreteHistoryRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub graph: Arc<DgraphClient>,
    pub config: Arc<GlobalConfig>,
    pub config_path: PathBuf,
}

impl AppState {
    /// Load configuration, connect the graph client, register models.
    pub async fn init(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = resolve_config_path(config_path);
        let config = load_global_config(&config_path).await;

        let graph = Arc::new(
            DgraphClient::from_config(&config.graph)
                .with_context(|| format!("Failed to create Dgraph client for {}", config.graph.endpoint))?,
        );

        let models = build_model_registry(&config.models);
        if models.get(&config.chat.model).is_none() {
            tracing::warn!(
                model = %config.chat.model,
                "Configured chat model is not available; chat turns will fail"
            );
        }

        let history = DgraphHistoryRepository::new(Arc::clone(&graph));
        let chat_service = ChatService::new(history, models, config.chat.clone());

        tracing::debug!(
            connection = %config.graph.connection_name,
            endpoint = %config.graph.endpoint,
            "Application state initialized"
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            graph,
            config: Arc::new(config),
            config_path,
        })
    }
}
