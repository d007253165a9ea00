//! DTO 模块
//!
//! 定义 API 请求和响应的数据传输对象。

pub mod bind_dto;
pub mod message_dto;

pub use bind_dto::*;
pub use message_dto::*;
