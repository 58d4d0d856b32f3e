//! 人格 DTO
//!
//! 定义人格相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建人格请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonaRequest {
    /// 人格名称（唯一键）
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// 角色定位
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    /// 性格特质
    #[validate(length(min = 1, message = "temperament is required"))]
    pub temperament: String,
    /// 专业领域
    #[validate(length(min = 1, message = "expertise is required"))]
    pub expertise: String,
    /// 沟通风格
    #[validate(length(min = 1, message = "communication_style is required"))]
    pub communication_style: String,
    /// 使用的模型（缺省取配置默认模型）
    pub model: Option<String>,
    /// 生成温度
    #[validate(range(min = 0.0, max = 1.0, message = "temperature must be in [0, 1]"))]
    pub temperature: Option<f32>,
    /// 回复 Token 上限
    pub max_tokens: Option<u32>,
    /// top-p
    #[validate(range(min = 0.0, max = 1.0, message = "top_p must be in [0, 1]"))]
    pub top_p: Option<f32>,
}

/// 人格响应
#[derive(Debug, Serialize)]
pub struct PersonaResponse {
    /// 人格名称
    pub name: String,
    /// 角色定位
    pub role: String,
    /// 性格特质
    pub temperament: String,
    /// 专业领域
    pub expertise: String,
    /// 沟通风格
    pub communication_style: String,
    /// 使用的模型
    pub model: String,
    /// 生成温度
    pub temperature: f32,
    /// 回复 Token 上限
    pub max_tokens: u32,
    /// top-p
    pub top_p: f32,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 人格列表响应
#[derive(Debug, Serialize)]
pub struct PersonaListResponse {
    /// 人格列表
    pub personas: Vec<PersonaResponse>,
    /// 总数
    pub total: usize,
}

/// 创建人格响应
#[derive(Debug, Serialize)]
pub struct CreatePersonaResponse {
    /// 人格名称
    pub name: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 消息
    pub message: String,
}

/// 删除人格响应
#[derive(Debug, Serialize)]
pub struct DeletePersonaResponse {
    /// 人格名称
    pub name: String,
    /// 消息
    pub message: String,
}
