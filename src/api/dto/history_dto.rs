//! 历史 DTO
//!
//! 定义对话历史相关的响应数据结构。

use serde::Serialize;

/// 历史消息响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// 消息角色
    pub role: String,
    /// 消息内容
    pub content: String,
}

/// 对话历史响应
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// 人格名称
    pub persona: String,
    /// 按序消息列表
    pub messages: Vec<MessageResponse>,
    /// 总数
    pub total: usize,
}

/// 历史重置响应
#[derive(Debug, Serialize)]
pub struct ResetHistoryResponse {
    /// 人格名称
    pub persona: String,
    /// 消息
    pub message: String,
}
