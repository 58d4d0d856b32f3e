use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::config::PersonaDefaults;

/// 人格实体
///
/// 名称是人格列表中的唯一查找键。不支持重命名：只有创建和删除操作。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// 人格名称（唯一键）
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

    /// 生成温度，[0, 1]
    pub temperature: f32,

    /// 回复 Token 上限
    pub max_tokens: u32,

    /// top-p，[0, 1]
    pub top_p: f32,

    /// 创建时间
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Persona {
    /// 创建新人格，生成参数取配置默认值
    pub fn new(
        name: &str,
        role: &str,
        temperament: &str,
        expertise: &str,
        communication_style: &str,
        model: &str,
        defaults: &PersonaDefaults,
    ) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            temperament: temperament.to_string(),
            expertise: expertise.to_string(),
            communication_style: communication_style.to_string(),
            model: model.to_string(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            top_p: defaults.top_p,
            created_at: Utc::now(),
        }
    }

    /// 构建本轮对话的系统提示词
    ///
    /// 提示词内嵌当前长期记忆文本和本轮话题，模型看到的早期历史
    /// 只有这段记忆，不会重读完整日志。
    pub fn system_prompt(&self, topic: &str, memory: &str) -> String {
        format!(
            "You are {name}, {role} with expertise in {expertise}.\n\
             Personality: {temperament}\n\
             Style: {style}\n\
             Topic: {topic}\n\
             \n\
             Stay in character as {name} at all times and respond naturally \
             to the conversation flow, drawing on your expertise. Keep replies \
             short unless asked for more detail.\n\
             \n\
             Long-term memory of this conversation: {memory}\n\
             \n\
             Respond strictly as {name}.",
            name = self.name,
            role = self.role,
            expertise = self.expertise,
            temperament = self.temperament,
            style = self.communication_style,
            topic = topic,
            memory = memory,
        )
    }

    /// 首次启动时写入的示例人格
    pub fn seed_defaults(defaults: &PersonaDefaults, default_model: &str) -> Vec<Persona> {
        vec![
            Persona::new(
                "Sherlock Holmes",
                "Detective",
                "Analytical",
                "Criminology",
                "Formal",
                default_model,
                defaults,
            ),
            Persona::new(
                "Marie Curie",
                "Scientist",
                "Determined",
                "Physics",
                "Evidence-based",
                default_model,
                defaults,
            ),
        ]
    }
}
