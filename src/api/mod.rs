//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::AppError;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::persona_routes::create_persona_router())
        .merge(routes::history_routes::create_history_router())
        .merge(routes::chat_routes::create_chat_router())
        .merge(routes::model_routes::create_model_router());

    Router::new()
        .nest("/api/v1", api)
        // 原始前端跨域访问 API，放开 CORS
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn initialize_api(app_state: AppState) -> Result<Router, AppError> {
    tracing::info!("Initializing API router...");
    Ok(create_router(app_state))
}
