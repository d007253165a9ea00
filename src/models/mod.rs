//! 核心数据模型模块
//!
//! 定义 Segment, Memo, Binding 和入站消息事件。

pub mod binding;
pub mod memo;
pub mod message;
pub mod segment;

pub use binding::*;
pub use memo::*;
pub use message::*;
pub use segment::*;
