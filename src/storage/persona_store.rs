//! 人格存储
//!
//! 人格列表整体存放在一个 JSON 文件中，每次操作整读整写。
//! 读取失败按"无数据"处理；没有跨请求互斥，并发请求可能相互覆盖。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::models::persona::Persona;

/// 人格存储 trait
///
/// 显式的 load/save 接口，由请求处理方注入，不使用进程级单例。
#[async_trait]
pub trait PersonaStore: Send + Sync {
    /// 加载全部人格
    async fn load(&self) -> Result<Vec<Persona>>;

    /// 整体保存人格列表
    async fn save(&self, personas: &[Persona]) -> Result<()>;

    /// 人格文件是否已存在
    fn exists(&self) -> bool;
}

/// JSON 文件人格存储
pub struct JsonPersonaStore {
    path: PathBuf,
}

impl JsonPersonaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PersonaStore for JsonPersonaStore {
    async fn load(&self) -> Result<Vec<Persona>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read persona file");
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(personas) => Ok(personas),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "persona file is not valid JSON");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, personas: &[Persona]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(personas)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}
