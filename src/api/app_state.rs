use crate::backend::ModelBackend;
use crate::config::config::AppConfig;
use crate::observability::AppMetrics;
use crate::services::chat::ChatService;
use crate::services::persona::PersonaService;
use crate::storage::history_store::HistoryStore;
use crate::storage::persona_store::PersonaStore;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Persona store for whole-list load/save
    pub persona_store: Arc<dyn PersonaStore>,
    /// History store for per-persona log and summary files
    pub history_store: Arc<dyn HistoryStore>,
    /// Model backend client
    pub backend: Arc<dyn ModelBackend>,
    /// Persona service for persona CRUD logic
    pub persona_service: Arc<dyn PersonaService>,
    /// Chat service for turn orchestration
    pub chat_service: Arc<dyn ChatService>,
    /// Application metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"Arc<AppConfig>")
            .field("persona_store", &"Arc<dyn PersonaStore>")
            .field("history_store", &"Arc<dyn HistoryStore>")
            .field("backend", &"Arc<dyn ModelBackend>")
            .field("persona_service", &"Arc<dyn PersonaService>")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<AppConfig>,
        persona_store: Arc<dyn PersonaStore>,
        history_store: Arc<dyn HistoryStore>,
        backend: Arc<dyn ModelBackend>,
        persona_service: Box<dyn PersonaService>,
        chat_service: Box<dyn ChatService>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            config,
            persona_store,
            history_store,
            backend,
            persona_service: Arc::from(persona_service),
            chat_service: Arc::from(chat_service),
            metrics,
        }
    }
}
