//! 长期记忆摘要服务
//!
//! 让一段有界的记忆文本跟上无界增长的对话日志，且从不重读完整日志：
//! 每次刷新只看最近的窗口消息加上已有摘要，更早的内容默认已经折叠
//! 在摘要里。新旧信息的合并完全交给后端模型，本地不做结构化比对。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{GenerationOptions, ModelBackend};
use crate::config::config::MemoryConfig;
use crate::models::message::Message;
use crate::models::persona::Persona;
use crate::storage::history_store::HistoryStore;

/// 尚无摘要时代入提示词的占位文本，给模型一个明确的锚点
pub const MEMORY_SEED: &str =
    "No previous long-term memory. This is the beginning of the conversation; \
     build the long-term memory from it.";

/// 摘要刷新结果
///
/// 区分"已更新"和"因故未变"两条路径。对聊天流程两者都只是
/// 一段要采用的文本，但测试需要断言走了哪条路径。
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryRefresh {
    /// 后端返回了新摘要，已整体替换并持久化
    Updated(String),
    /// 摘要保持原样（历史太短，或后端调用失败）
    Unchanged(String),
}

impl SummaryRefresh {
    pub fn text(&self) -> &str {
        match self {
            SummaryRefresh::Updated(text) | SummaryRefresh::Unchanged(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            SummaryRefresh::Updated(text) | SummaryRefresh::Unchanged(text) => text,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, SummaryRefresh::Updated(_))
    }
}

/// 记忆摘要服务 trait
#[async_trait]
pub trait MemorySummarizer: Send + Sync {
    /// 日志长度是否到达刷新节奏
    fn is_due(&self, log_len: usize) -> bool;

    /// 刷新摘要
    ///
    /// 成功时新文本整体替换旧摘要并立即持久化；任何失败都只记日志，
    /// 返回原摘要，不向调用方抛错。
    async fn refresh(&self, persona: &Persona, log: &[Message], current: &str) -> SummaryRefresh;
}

/// 记忆摘要服务实现
pub struct MemorySummarizerImpl {
    backend: Arc<dyn ModelBackend>,
    history_store: Arc<dyn HistoryStore>,
    config: MemoryConfig,
}

impl MemorySummarizerImpl {
    /// 创建新的服务实例
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        history_store: Arc<dyn HistoryStore>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            backend,
            history_store,
            config,
        }
    }

    /// 构建摘要刷新的系统指令
    fn instruction(persona: &Persona, current: &str) -> String {
        format!(
            "You maintain the long-term memory of an ongoing conversation with \
             {name}. Merge the information in the new messages below into the \
             previous memory so that nothing already recorded is lost. Preserve \
             every name, date, place, event, promise, agreement, relationship \
             and goal that appears, including any commitments made by {name}. \
             The memory must never be empty. Respond with the updated memory \
             text only.\n\
             \n\
             Previous long-term memory: {current}\n\
             New messages to fold in:",
            name = persona.name,
            current = current,
        )
    }
}

#[async_trait]
impl MemorySummarizer for MemorySummarizerImpl {
    fn is_due(&self, log_len: usize) -> bool {
        log_len % self.config.refresh_cadence == 0
    }

    async fn refresh(&self, persona: &Persona, log: &[Message], current: &str) -> SummaryRefresh {
        if log.is_empty() {
            return SummaryRefresh::Unchanged(String::new());
        }

        if log.len() < self.config.min_history {
            return SummaryRefresh::Unchanged(current.to_string());
        }

        let seed = if current.is_empty() {
            MEMORY_SEED
        } else {
            current
        };

        let window_start = log.len().saturating_sub(self.config.window);
        let mut messages = vec![Message::system(Self::instruction(persona, seed))];
        messages.extend_from_slice(&log[window_start..]);

        debug!(
            persona = %persona.name,
            window = log.len() - window_start,
            "refreshing long-term memory"
        );

        let options = GenerationOptions {
            temperature: self.config.summary_temperature,
            max_tokens: self.config.summary_max_tokens,
            top_p: None,
        };

        match self.backend.chat(&persona.model, &messages, options).await {
            Ok(new_summary) => {
                if let Err(e) = self
                    .history_store
                    .save_summary(&persona.name, &new_summary)
                    .await
                {
                    warn!(persona = %persona.name, error = %e, "failed to persist summary");
                }
                SummaryRefresh::Updated(new_summary)
            }
            Err(e) => {
                warn!(persona = %persona.name, error = %e, "summary refresh failed");
                SummaryRefresh::Unchanged(current.to_string())
            }
        }
    }
}

/// 创建记忆摘要服务
pub fn create_memory_summarizer(
    backend: Arc<dyn ModelBackend>,
    history_store: Arc<dyn HistoryStore>,
    config: MemoryConfig,
) -> Box<dyn MemorySummarizer> {
    Box::new(MemorySummarizerImpl::new(backend, history_store, config))
}
