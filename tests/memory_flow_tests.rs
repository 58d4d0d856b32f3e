// Integration tests for the long-term memory flow
//
// Tests cover:
// - The "Ada" scenario: cadence-driven summary refreshes over real file stores
// - Summarizer failure masking and persistence side effects
// - Persona deletion and history reset lifecycles
// - Log round-trip ordering

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use mnemos::backend::{GenerationOptions, ModelBackend};
use mnemos::config::config::{MemoryConfig, PersonaDefaults};
use mnemos::error::{AppError, Result};
use mnemos::models::message::{Message, Role};
use mnemos::models::persona::Persona;
use mnemos::services::chat::{ChatService, create_chat_service};
use mnemos::services::persona::{PersonaService, create_persona_service};
use mnemos::services::summarizer::{
    MEMORY_SEED, MemorySummarizer, SummaryRefresh, create_memory_summarizer,
};
use mnemos::storage::history_store::{FileHistoryStore, HistoryStore};
use mnemos::storage::persona_store::{JsonPersonaStore, PersonaStore};

/// 能区分普通对话和摘要刷新两类请求的后端桩
///
/// 摘要刷新的系统指令以固定前缀开头，据此分流：对话请求返回
/// "reply"，摘要请求按队列返回预设文本（或失败）。
struct SniffingBackend {
    chat_calls: AtomicUsize,
    summary_calls: AtomicUsize,
    summary_prompts: Mutex<Vec<Vec<Message>>>,
    summary_queue: Mutex<Vec<String>>,
    fail_summaries: bool,
}

impl SniffingBackend {
    fn new(summaries: &[&str]) -> Self {
        let mut queue: Vec<String> = summaries.iter().map(|s| s.to_string()).collect();
        queue.reverse();
        Self {
            chat_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            summary_prompts: Mutex::new(Vec::new()),
            summary_queue: Mutex::new(queue),
            fail_summaries: false,
        }
    }

    fn failing_summaries() -> Self {
        let mut backend = Self::new(&[]);
        backend.fail_summaries = true;
        backend
    }

    fn is_summary_prompt(messages: &[Message]) -> bool {
        messages
            .first()
            .map(|m| {
                m.role == Role::System
                    && m.content.starts_with("You maintain the long-term memory")
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl ModelBackend for SniffingBackend {
    async fn chat(
        &self,
        _model: &str,
        messages: &[Message],
        _options: GenerationOptions,
    ) -> Result<String> {
        if Self::is_summary_prompt(messages) {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            self.summary_prompts.lock().unwrap().push(messages.to_vec());
            if self.fail_summaries {
                return Err(AppError::Backend("summary backend down".into()));
            }
            return Ok(self
                .summary_queue
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "SUMMARY".to_string()));
        }

        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        Ok("reply".to_string())
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec!["llama3.2".to_string()])
    }
}

struct World {
    _temp_dir: TempDir,
    backend: Arc<SniffingBackend>,
    persona_store: Arc<JsonPersonaStore>,
    history_store: Arc<FileHistoryStore>,
    persona_service: Box<dyn PersonaService>,
    chat_service: Box<dyn ChatService>,
}

async fn world(backend: SniffingBackend) -> World {
    let temp_dir = TempDir::new().unwrap();
    let persona_store = Arc::new(JsonPersonaStore::new(temp_dir.path().join("personas.json")));
    let history_store = Arc::new(FileHistoryStore::new(temp_dir.path().join("history")));
    let backend = Arc::new(backend);

    let summarizer: Arc<dyn MemorySummarizer> = Arc::from(create_memory_summarizer(
        backend.clone(),
        history_store.clone(),
        MemoryConfig::default(),
    ));

    let persona_service = create_persona_service(persona_store.clone(), history_store.clone());
    let chat_service = create_chat_service(
        persona_store.clone(),
        history_store.clone(),
        backend.clone(),
        summarizer,
        MemoryConfig::default(),
    );

    World {
        _temp_dir: temp_dir,
        backend,
        persona_store,
        history_store,
        persona_service,
        chat_service,
    }
}

fn ada() -> Persona {
    Persona::new(
        "Ada",
        "Mathematician",
        "Curious",
        "Computing",
        "Precise",
        "llama3.2",
        &PersonaDefaults::default(),
    )
}

// ============ Ada Scenario Tests ============

#[tokio::test]
async fn test_ada_five_turns_refresh_twice_and_store_latest_summary() {
    let world = world(SniffingBackend::new(&["SUMMARY_v1", "SUMMARY_v2"])).await;
    world.persona_service.create(ada()).await.unwrap();

    for i in 0..5 {
        world
            .chat_service
            .send_message("Ada", &format!("turn {i}"))
            .await
            .unwrap();
    }

    // 节奏为 3：用户消息入列后日志长度为 3 和 9 时各刷新一次
    assert_eq!(world.backend.summary_calls.load(Ordering::SeqCst), 2);
    assert_eq!(world.backend.chat_calls.load(Ordering::SeqCst), 5);

    let stored = world.history_store.load_summary("Ada").await.unwrap();
    assert_eq!(stored, "SUMMARY_v2");
}

#[tokio::test]
async fn test_summary_prompt_carries_window_and_seed() {
    let world = world(SniffingBackend::new(&["SUMMARY_v1", "SUMMARY_v2"])).await;
    world.persona_service.create(ada()).await.unwrap();

    for i in 0..5 {
        world
            .chat_service
            .send_message("Ada", &format!("turn {i}"))
            .await
            .unwrap();
    }

    let prompts = world.backend.summary_prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);

    // 首次刷新：日志 3 条，全部进入窗口，摘要为空时使用占位文本
    let first = &prompts[0];
    assert_eq!(first.len(), 4);
    assert!(first[0].content.contains(MEMORY_SEED));

    // 第二次刷新：日志 9 条，只取最后 5 条，旧摘要文本进入指令
    let second = &prompts[1];
    assert_eq!(second.len(), 6);
    assert!(second[0].content.contains("SUMMARY_v1"));
    assert_eq!(second[1].content, "turn 2");
    assert_eq!(second[5].content, "turn 4");
}

// ============ Failure Masking Tests ============

#[tokio::test]
async fn test_failed_refresh_keeps_old_summary_and_writes_nothing() {
    let world = world(SniffingBackend::failing_summaries()).await;

    let summarizer: Arc<dyn MemorySummarizer> = Arc::from(create_memory_summarizer(
        world.backend.clone(),
        world.history_store.clone(),
        MemoryConfig::default(),
    ));

    let log: Vec<Message> = (0..4)
        .map(|i| {
            if i % 2 == 0 {
                Message::user(format!("m{i}"))
            } else {
                Message::assistant(format!("m{i}"))
            }
        })
        .collect();

    let result = summarizer.refresh(&ada(), &log, "old").await;
    assert_eq!(result, SummaryRefresh::Unchanged("old".to_string()));
    assert_eq!(world.backend.summary_calls.load(Ordering::SeqCst), 1);
    assert!(!world.history_store.summary_path("Ada").exists());
}

#[tokio::test]
async fn test_failed_refresh_does_not_fail_the_chat_turn() {
    let world = world(SniffingBackend::failing_summaries()).await;
    world.persona_service.create(ada()).await.unwrap();

    // 第 2 轮触发刷新，刷新失败，但对话本身正常返回
    let mut outcomes = Vec::new();
    for i in 0..2 {
        outcomes.push(
            world
                .chat_service
                .send_message("Ada", &format!("turn {i}"))
                .await
                .unwrap(),
        );
    }

    assert_eq!(world.backend.summary_calls.load(Ordering::SeqCst), 1);
    assert!(!outcomes[1].summary_refreshed);
    assert_eq!(outcomes[1].reply, "reply");
    assert!(!world.history_store.summary_path("Ada").exists());
}

// ============ Lifecycle Tests ============

#[tokio::test]
async fn test_delete_persona_removes_log_and_summary() {
    let world = world(SniffingBackend::new(&["SUMMARY_v1"])).await;
    world.persona_service.create(ada()).await.unwrap();

    for i in 0..2 {
        world
            .chat_service
            .send_message("Ada", &format!("turn {i}"))
            .await
            .unwrap();
    }
    assert!(world.history_store.log_path("Ada").exists());
    assert!(world.history_store.summary_path("Ada").exists());

    world.persona_service.delete("Ada").await.unwrap();

    assert!(!world.history_store.log_path("Ada").exists());
    assert!(!world.history_store.summary_path("Ada").exists());
    assert!(matches!(
        world.persona_service.get("Ada").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        world.chat_service.send_message("Ada", "hello").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_history_reset_clears_log_and_summary_together() {
    let world = world(SniffingBackend::new(&["SUMMARY_v1"])).await;
    world.persona_service.create(ada()).await.unwrap();

    for i in 0..2 {
        world
            .chat_service
            .send_message("Ada", &format!("turn {i}"))
            .await
            .unwrap();
    }
    assert!(world.history_store.summary_path("Ada").exists());

    world.history_store.clear("Ada").await.unwrap();

    assert!(world.history_store.load_log("Ada").await.unwrap().is_empty());
    assert_eq!(world.history_store.load_summary("Ada").await.unwrap(), "");
    // 人格本身保留
    assert!(world.persona_service.get("Ada").await.is_ok());
}

// ============ Round-Trip Tests ============

#[tokio::test]
async fn test_five_turns_persist_ten_messages_in_order() {
    let world = world(SniffingBackend::new(&["SUMMARY_v1", "SUMMARY_v2"])).await;
    world.persona_service.create(ada()).await.unwrap();

    for i in 0..5 {
        world
            .chat_service
            .send_message("Ada", &format!("turn {i}"))
            .await
            .unwrap();
    }

    let log = world.history_store.load_log("Ada").await.unwrap();
    assert_eq!(log.len(), 10);
    for (i, pair) in log.chunks(2).enumerate() {
        assert_eq!(pair[0], Message::user(format!("turn {i}")));
        assert_eq!(pair[1], Message::assistant("reply"));
    }
}

#[tokio::test]
async fn test_personas_survive_reload() {
    let world = world(SniffingBackend::new(&[])).await;
    world.persona_service.create(ada()).await.unwrap();

    // 每次请求都整读文件，新 store 实例看到同样内容
    let reloaded = JsonPersonaStore::new(world.persona_store.path().to_path_buf());
    let personas = reloaded.load().await.unwrap();
    assert_eq!(personas.len(), 1);
    assert_eq!(personas[0].name, "Ada");
}
