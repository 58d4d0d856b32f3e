use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

/// 模型后端配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackendConfig {
    /// Ollama 服务器地址
    pub base_url: String,
    /// 默认模型（创建人格未指定模型时使用，也是模型列表的降级返回值）
    pub default_model: String,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// 人格列表文件
    pub personas_file: PathBuf,
    /// 对话历史与摘要目录
    pub history_dir: PathBuf,
}

/// 长期记忆配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// 摘要刷新节奏：历史长度为该值的整数倍时刷新
    pub refresh_cadence: usize,
    /// 历史消息少于该值时不做摘要
    pub min_history: usize,
    /// 每次摘要只看最近的 N 条消息
    pub window: usize,
    /// 普通对话提示词包含的历史消息条数
    pub chat_window: usize,
    /// 摘要生成温度（固定低温，与人格自身温度无关）
    pub summary_temperature: f32,
    /// 摘要输出 Token 上限（小于普通回复的预算）
    pub summary_max_tokens: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            refresh_cadence: 3,
            min_history: 3,
            window: 5,
            chat_window: 3,
            summary_temperature: 0.1,
            summary_max_tokens: 200,
        }
    }
}

/// 人格生成参数默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaDefaults {
    /// 默认温度
    pub temperature: f32,
    /// 默认回复 Token 上限
    pub max_tokens: u32,
    /// 默认 top-p
    pub top_p: f32,
}

impl Default for PersonaDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
            top_p: 0.9,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 日志文件目录（为空时仅输出到终端）
    pub log_dir: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 模型后端配置
    pub backend: BackendConfig,
    /// 存储配置
    pub storage: StorageConfig,
    /// 长期记忆配置
    pub memory: MemoryConfig,
    /// 人格默认参数
    pub persona_defaults: PersonaDefaults,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 5000,
            },
            backend: BackendConfig {
                base_url: "http://localhost:11434".into(),
                default_model: "llama3.2".into(),
                request_timeout: 60,
            },
            storage: StorageConfig {
                personas_file: PathBuf::from("./data/personas.json"),
                history_dir: PathBuf::from("./data/history"),
            },
            memory: MemoryConfig::default(),
            persona_defaults: PersonaDefaults::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                log_dir: None,
            },
            app_name: "mnemos".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config
    }
}
