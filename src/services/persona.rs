//! 人格服务
//!
//! 提供人格的创建、查询和删除。人格没有更新操作：名称是唯一键，
//! 不支持重命名。删除时级联清理对话日志和摘要文件。

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::persona::Persona;
use crate::storage::history_store::HistoryStore;
use crate::storage::persona_store::PersonaStore;

/// 人格服务 trait
#[async_trait]
pub trait PersonaService: Send + Sync {
    /// 列出全部人格
    async fn list(&self) -> Result<Vec<Persona>>;

    /// 按名称查找人格
    async fn get(&self, name: &str) -> Result<Persona>;

    /// 创建人格
    async fn create(&self, persona: Persona) -> Result<Persona>;

    /// 删除人格及其日志和摘要
    async fn delete(&self, name: &str) -> Result<()>;
}

/// 人格服务实现
pub struct PersonaServiceImpl {
    persona_store: Arc<dyn PersonaStore>,
    history_store: Arc<dyn HistoryStore>,
}

impl PersonaServiceImpl {
    /// 创建新的服务实例
    pub fn new(
        persona_store: Arc<dyn PersonaStore>,
        history_store: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            persona_store,
            history_store,
        }
    }

    fn required_fields(persona: &Persona) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if persona.name.trim().is_empty() {
            missing.push("name");
        }
        if persona.role.trim().is_empty() {
            missing.push("role");
        }
        if persona.temperament.trim().is_empty() {
            missing.push("temperament");
        }
        if persona.expertise.trim().is_empty() {
            missing.push("expertise");
        }
        if persona.communication_style.trim().is_empty() {
            missing.push("communication_style");
        }
        missing
    }
}

#[async_trait]
impl PersonaService for PersonaServiceImpl {
    async fn list(&self) -> Result<Vec<Persona>> {
        self.persona_store.load().await
    }

    async fn get(&self, name: &str) -> Result<Persona> {
        self.persona_store
            .load()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Persona not found: {name}")))
    }

    async fn create(&self, persona: Persona) -> Result<Persona> {
        let missing = Self::required_fields(&persona);
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing fields: {}",
                missing.join(", ")
            )));
        }

        let mut personas = self.persona_store.load().await?;
        if personas.iter().any(|p| p.name == persona.name) {
            return Err(AppError::Validation(format!(
                "Persona already exists: {}",
                persona.name
            )));
        }

        personas.push(persona.clone());
        self.persona_store.save(&personas).await?;
        Ok(persona)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let personas = self.persona_store.load().await?;
        if !personas.iter().any(|p| p.name == name) {
            return Err(AppError::NotFound(format!("Persona not found: {name}")));
        }

        // 日志和摘要与人格 1:1:1 绑定，先清理文件再收缩列表
        self.history_store.clear(name).await?;

        let remaining: Vec<Persona> = personas.into_iter().filter(|p| p.name != name).collect();
        self.persona_store.save(&remaining).await?;
        Ok(())
    }
}

/// 创建人格服务
pub fn create_persona_service(
    persona_store: Arc<dyn PersonaStore>,
    history_store: Arc<dyn HistoryStore>,
) -> Box<dyn PersonaService> {
    Box::new(PersonaServiceImpl::new(persona_store, history_store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::PersonaDefaults;
    use crate::models::message::Message;
    use crate::storage::history_store::{FileHistoryStore, HistoryStore};
    use crate::storage::persona_store::JsonPersonaStore;
    use tempfile::TempDir;

    fn persona(name: &str) -> Persona {
        Persona::new(
            name,
            "Detective",
            "Analytical",
            "Criminology",
            "Formal",
            "llama3.2",
            &PersonaDefaults::default(),
        )
    }

    fn service() -> (TempDir, PersonaServiceImpl, Arc<FileHistoryStore>) {
        let temp_dir = TempDir::new().unwrap();
        let persona_store = Arc::new(JsonPersonaStore::new(temp_dir.path().join("personas.json")));
        let history_store = Arc::new(FileHistoryStore::new(temp_dir.path().join("history")));
        let service = PersonaServiceImpl::new(persona_store, history_store.clone());
        (temp_dir, service, history_store)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (_guard, service, _history) = service();

        service.create(persona("Sherlock Holmes")).await.unwrap();
        service.create(persona("Marie Curie")).await.unwrap();

        let personas = service.list().await.unwrap();
        assert_eq!(personas.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let (_guard, service, _history) = service();

        service.create(persona("Sherlock Holmes")).await.unwrap();
        let result = service.create(persona("Sherlock Holmes")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (_guard, service, _history) = service();

        let mut incomplete = persona("Ada");
        incomplete.role = String::new();
        incomplete.expertise = "  ".to_string();

        let result = service.create(incomplete).await;
        match result {
            Err(AppError::Validation(message)) => {
                assert!(message.contains("role"));
                assert!(message.contains("expertise"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (_guard, service, _history) = service();
        assert!(matches!(
            service.get("nobody").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_history_and_summary() {
        let (_guard, service, history) = service();

        service.create(persona("Ada")).await.unwrap();
        history
            .save_log("Ada", &[Message::user("hi")])
            .await
            .unwrap();
        history.save_summary("Ada", "facts").await.unwrap();

        service.delete("Ada").await.unwrap();

        assert!(!history.log_path("Ada").exists());
        assert!(!history.summary_path("Ada").exists());
        assert!(matches!(
            service.get("Ada").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let (_guard, service, _history) = service();
        assert!(matches!(
            service.delete("nobody").await,
            Err(AppError::NotFound(_))
        ));
    }
}
