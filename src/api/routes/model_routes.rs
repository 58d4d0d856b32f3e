//! Model Routes
//!
//! 定义模型列表相关的 API 路由。

use crate::api::handlers::model_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建模型路由器
pub fn create_model_router() -> Router<AppState> {
    Router::new().route("/models", get(list_models))
}
