//! 模型后端模块
//!
//! 定义对外部文本生成服务的访问接口。后端无状态：
//! 普通回复和摘要刷新走同一个 chat 操作，只是参数不同。

pub mod ollama;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::message::Message;

pub use ollama::OllamaBackend;

/// 单次生成请求的参数
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// 温度
    pub temperature: f32,
    /// 输出 Token 上限
    pub max_tokens: u32,
    /// top-p（摘要刷新不使用）
    pub top_p: Option<f32>,
}

/// 模型后端 trait
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// 发送一次对话生成请求，返回生成文本
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: GenerationOptions,
    ) -> Result<String>;

    /// 列出后端可用的模型标识
    async fn list_models(&self) -> Result<Vec<String>>;
}
