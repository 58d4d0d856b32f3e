//! 服务模块

pub mod chat;
pub mod persona;
pub mod summarizer;

pub use chat::{ChatOutcome, ChatService, create_chat_service};
pub use persona::{PersonaService, create_persona_service};
pub use summarizer::{
    MEMORY_SEED, MemorySummarizer, SummaryRefresh, create_memory_summarizer,
};
