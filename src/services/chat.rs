//! 对话编排服务
//!
//! 处理一轮对话：追加用户消息、组装提示词、调用后端、按节奏触发
//! 摘要刷新、追加助手回复并持久化日志。所有存储访问都是每请求
//! 重新读写，无跨请求互斥。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{GenerationOptions, ModelBackend};
use crate::config::config::MemoryConfig;
use crate::error::{AppError, Result};
use crate::models::message::Message;
use crate::services::summarizer::MemorySummarizer;
use crate::storage::history_store::HistoryStore;
use crate::storage::persona_store::PersonaStore;

/// 单轮对话的结果
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// 助手回复
    pub reply: String,
    /// 本轮结束时的长期记忆文本
    pub summary: String,
    /// 本轮是否成功刷新了摘要
    pub summary_refreshed: bool,
}

/// 对话服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 处理一条用户消息，返回助手回复
    async fn send_message(&self, persona_name: &str, message: &str) -> Result<ChatOutcome>;
}

/// 对话服务实现
pub struct ChatServiceImpl {
    persona_store: Arc<dyn PersonaStore>,
    history_store: Arc<dyn HistoryStore>,
    backend: Arc<dyn ModelBackend>,
    summarizer: Arc<dyn MemorySummarizer>,
    config: MemoryConfig,
}

impl ChatServiceImpl {
    /// 创建新的服务实例
    pub fn new(
        persona_store: Arc<dyn PersonaStore>,
        history_store: Arc<dyn HistoryStore>,
        backend: Arc<dyn ModelBackend>,
        summarizer: Arc<dyn MemorySummarizer>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            persona_store,
            history_store,
            backend,
            summarizer,
            config,
        }
    }

    /// 从用户消息截取话题行（最多 50 个字符）
    fn topic_of(message: &str) -> String {
        let mut topic: String = message.chars().take(50).collect();
        if message.chars().count() > 50 {
            topic.push_str("...");
        }
        topic
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn send_message(&self, persona_name: &str, message: &str) -> Result<ChatOutcome> {
        let personas = self.persona_store.load().await?;
        let persona = personas
            .iter()
            .find(|p| p.name == persona_name)
            .ok_or_else(|| AppError::NotFound(format!("Persona not found: {persona_name}")))?;

        let mut log = self.history_store.load_log(&persona.name).await?;
        log.push(Message::user(message));

        let mut summary = self.history_store.load_summary(&persona.name).await?;

        let system = persona.system_prompt(&Self::topic_of(message), &summary);
        let window_start = log.len().saturating_sub(self.config.chat_window);
        let mut prompt = vec![Message::system(system)];
        prompt.extend_from_slice(&log[window_start..]);

        debug!(persona = %persona.name, log_len = log.len(), "requesting chat reply");

        let options = GenerationOptions {
            temperature: persona.temperature,
            max_tokens: persona.max_tokens,
            top_p: Some(persona.top_p),
        };

        let reply = self
            .backend
            .chat(&persona.model, &prompt, options)
            .await
            .map_err(|e| {
                warn!(persona = %persona.name, error = %e, "chat generation failed");
                AppError::Backend("model generation failed".to_string())
            })?;

        // 刷新检查发生在助手回复入列之前：本轮回复不进入
        // 本轮的摘要窗口，要到下一个节奏点才会被折叠进去。
        let mut summary_refreshed = false;
        if self.summarizer.is_due(log.len()) {
            let refresh = self.summarizer.refresh(persona, &log, &summary).await;
            summary_refreshed = refresh.is_updated();
            summary = refresh.into_text();
        }

        log.push(Message::assistant(&reply));

        if let Err(e) = self.history_store.save_log(&persona.name, &log).await {
            warn!(persona = %persona.name, error = %e, "failed to persist conversation log");
        }

        Ok(ChatOutcome {
            reply,
            summary,
            summary_refreshed,
        })
    }
}

/// 创建对话服务
pub fn create_chat_service(
    persona_store: Arc<dyn PersonaStore>,
    history_store: Arc<dyn HistoryStore>,
    backend: Arc<dyn ModelBackend>,
    summarizer: Arc<dyn MemorySummarizer>,
    config: MemoryConfig,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(
        persona_store,
        history_store,
        backend,
        summarizer,
        config,
    ))
}
