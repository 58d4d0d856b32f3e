//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod chat_dto;
pub mod history_dto;
pub mod model_dto;
pub mod persona_dto;

pub use chat_dto::*;
pub use history_dto::*;
pub use model_dto::*;
pub use persona_dto::*;
