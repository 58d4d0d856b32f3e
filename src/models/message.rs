use serde::{Deserialize, Serialize};

/// 消息角色
///
/// 小写序列化，同时匹配历史文件格式和 Ollama 线上格式。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 系统消息（仅用于提示词组装，不落盘）
    System,
    /// 用户消息
    User,
    /// 助手消息
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// 对话消息
///
/// 每个人格的历史是按插入顺序排列的消息序列，正常运行期间只追加。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// 消息角色
    pub role: Role,
    /// 消息内容
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
