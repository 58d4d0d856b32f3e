//! 模型 DTO
//!
//! 定义模型列表响应数据结构。

use serde::Serialize;

/// 模型列表响应
#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    /// 模型标识列表
    pub models: Vec<String>,
    /// 总数
    pub total: usize,
}
