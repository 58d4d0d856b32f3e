use mnemos::api::{self, app_state::AppState};
use mnemos::backend::{ModelBackend, ollama::OllamaBackend};
use mnemos::config::loader::ConfigLoader;
use mnemos::models::persona::Persona;
use mnemos::observability::{
    ObservabilityState, create_observability_router, init_tracing, metrics_middleware,
};
use mnemos::services::{create_chat_service, create_memory_summarizer, create_persona_service};
use mnemos::storage::history_store::FileHistoryStore;
use mnemos::storage::persona_store::{JsonPersonaStore, PersonaStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_tracing(&config.app_name, &config.logging);

    info!("Starting Mnemos...");
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let persona_store = Arc::new(JsonPersonaStore::new(config.storage.personas_file.clone()));
    let history_store = Arc::new(FileHistoryStore::new(config.storage.history_dir.clone()));
    info!("File stores initialized");

    let backend: Arc<dyn ModelBackend> = Arc::new(OllamaBackend::new(&config.backend)?);
    info!("Model backend client initialized: {}", config.backend.base_url);

    // 首次启动时写入示例人格
    if !persona_store.exists() {
        let seeds = Persona::seed_defaults(&config.persona_defaults, &config.backend.default_model);
        persona_store.save(&seeds).await?;
        info!("Seeded {} default personas", seeds.len());
    }

    let summarizer = Arc::from(create_memory_summarizer(
        backend.clone(),
        history_store.clone(),
        config.memory.clone(),
    ));
    info!("Memory summarizer initialized");

    let persona_service = create_persona_service(persona_store.clone(), history_store.clone());
    info!("Persona service initialized");

    let chat_service = create_chat_service(
        persona_store.clone(),
        history_store.clone(),
        backend.clone(),
        summarizer,
        config.memory.clone(),
    );
    info!("Chat service initialized");

    let observability_state = Arc::new(ObservabilityState::new("0.1.0".to_string()));

    let app_state = AppState::new(
        Arc::new(config.clone()),
        persona_store,
        history_store,
        backend,
        persona_service,
        chat_service,
        observability_state.metrics.clone(),
    );
    info!("Application state created");

    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state.clone())
        .merge(api_router)
        .layer(axum::middleware::from_fn_with_state(
            observability_state,
            metrics_middleware,
        ));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
