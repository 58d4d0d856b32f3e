//! History Routes
//!
//! 定义对话历史相关的 API 路由。

use crate::api::handlers::history_handler::*;
use axum::{
    Router,
    routing::{delete, get},
};

use crate::api::app_state::AppState;

/// 创建历史路由器
pub fn create_history_router() -> Router<AppState> {
    Router::new()
        .route("/personas/:name/history", get(get_history))
        .route("/personas/:name/history", delete(reset_history))
}
