//! Persona Routes
//!
//! 定义人格相关的 API 路由。

use crate::api::handlers::persona_handler::*;
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::app_state::AppState;

/// 创建人格路由器
pub fn create_persona_router() -> Router<AppState> {
    Router::new()
        .route("/personas", get(list_personas))
        .route("/personas", post(create_persona))
        .route("/personas/:name", delete(delete_persona))
}
