//! Memo 数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::binding::Platform;
use crate::models::message::InboundMessageEvent;
use crate::models::segment::{Segment, unique_tags};

/// 一条入站消息对应的 memo
///
/// 仅在单次分发过程中存在，由 Notion 客户端负责落库。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    /// 分发 ID，用于日志关联
    pub id: String,
    /// 原始文本
    pub raw_text: String,
    /// 按出现顺序排列的片段
    pub segments: Vec<Segment>,
    /// 来源平台
    pub source_platform: Platform,
    /// 发送者 ID
    pub sender_external_id: String,
    /// 接收时间
    pub received_at: DateTime<Utc>,
}

impl Memo {
    pub fn new(event: &InboundMessageEvent, segments: Vec<Segment>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            raw_text: event.raw_text.clone(),
            segments,
            source_platform: event.platform,
            sender_external_id: event.external_sender_id.clone(),
            received_at: Utc::now(),
        }
    }

    pub fn tags(&self) -> Vec<&str> {
        unique_tags(&self.segments)
    }
}
