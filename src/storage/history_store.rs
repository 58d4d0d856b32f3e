//! 对话历史与摘要存储
//!
//! 每个人格两个文件：`<名称>_history.json`（按序消息数组）和
//! `<名称>_summary.txt`（长期记忆文本）。两者生命周期绑定：
//! 重置历史或删除人格时一并删除。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::models::message::Message;
use crate::storage::sanitize_filename;

/// 历史存储 trait
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 加载对话日志，缺失或损坏时返回空
    async fn load_log(&self, persona: &str) -> Result<Vec<Message>>;

    /// 整体保存对话日志
    async fn save_log(&self, persona: &str, log: &[Message]) -> Result<()>;

    /// 加载长期记忆摘要，缺失时返回空字符串
    async fn load_summary(&self, persona: &str) -> Result<String>;

    /// 保存长期记忆摘要（摘要的唯一写入路径，除 clear 外）
    async fn save_summary(&self, persona: &str, summary: &str) -> Result<()>;

    /// 删除日志和摘要两个文件（历史重置和人格删除共用）
    async fn clear(&self, persona: &str) -> Result<()>;
}

/// 文件历史存储
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn log_path(&self, persona: &str) -> PathBuf {
        self.dir
            .join(format!("{}_history.json", sanitize_filename(persona)))
    }

    pub fn summary_path(&self, persona: &str) -> PathBuf {
        self.dir
            .join(format!("{}_summary.txt", sanitize_filename(persona)))
    }

    async fn remove_if_exists(path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load_log(&self, persona: &str) -> Result<Vec<Message>> {
        let path = self.log_path(persona);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read history file");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(log) => Ok(log),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "history file is not valid JSON");
                Ok(Vec::new())
            }
        }
    }

    async fn save_log(&self, persona: &str, log: &[Message]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(log)?;
        tokio::fs::write(self.log_path(persona), json).await?;
        Ok(())
    }

    async fn load_summary(&self, persona: &str) -> Result<String> {
        let path = self.summary_path(persona);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read summary file");
                Ok(String::new())
            }
        }
    }

    async fn save_summary(&self, persona: &str, summary: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.summary_path(persona), summary).await?;
        Ok(())
    }

    async fn clear(&self, persona: &str) -> Result<()> {
        Self::remove_if_exists(&self.log_path(persona)).await?;
        Self::remove_if_exists(&self.summary_path(persona)).await?;
        Ok(())
    }
}
