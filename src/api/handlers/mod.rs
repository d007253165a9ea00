//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod bind_handler;
pub mod message_handler;

pub use bind_handler::*;
pub use message_handler::*;
