//! Mnemos - 人格化聊天服务
//!
//! 为用户定义的人格（Persona）提供对话能力，并通过滚动式长期记忆摘要
//! 在不重读全部历史的前提下保留对话中的关键信息。

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
