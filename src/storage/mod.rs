//! 存储层模块
//!
//! 提供基于文件的数据持久化：人格列表一个 JSON 文件，
//! 每个人格一个历史 JSON 文件和一个摘要文本文件。

pub mod history_store;
pub mod persona_store;

pub use history_store::{FileHistoryStore, HistoryStore};
pub use persona_store::{JsonPersonaStore, PersonaStore};

/// 把人格名称转成文件名安全的形式
///
/// 空格和 `/` 替换为 `_`，整体转小写。
pub fn sanitize_filename(name: &str) -> String {
    name.replace(' ', "_").replace('/', "_").to_lowercase()
}
