//! Nomo - 聊天消息到 Notion 的桥接服务
//!
//! 把 WeChat/Lark 上发来的文本按 `#标签` 切分成有序片段，
//! 再写入发送者绑定的 Notion 数据库。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod notion;
pub mod observability;
pub mod services;
pub mod storage;
