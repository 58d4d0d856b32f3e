//! 对话 DTO
//!
//! 定义对话相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 对话请求
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    /// 人格名称
    #[validate(length(min = 1, message = "persona is required"))]
    pub persona: String,
    /// 用户消息
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// 对话响应
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// 助手回复
    pub response: String,
    /// 本轮是否刷新了长期记忆
    pub summary_refreshed: bool,
}
