//! 核心数据模型模块
//!
//! 定义 Mnemos 的核心数据结构：Persona, Message。

pub mod message;
pub mod persona;

pub use message::*;
pub use persona::*;
