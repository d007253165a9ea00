//! 入站消息事件
//!
//! 由 HTTP 层从各平台回调中解析出来，交给分发器处理。

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::binding::Platform;

/// 解码平台回调的原始字节，非 UTF-8 输入视为校验失败
pub fn decode_utf8(raw: &[u8]) -> Result<&str> {
    std::str::from_utf8(raw).map_err(|e| {
        AppError::Validation(format!(
            "message text is not valid UTF-8 (at byte {})",
            e.valid_up_to()
        ))
    })
}

/// 入站消息事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessageEvent {
    /// 来源平台
    pub platform: Platform,
    /// 发送者在平台上的 ID
    pub external_sender_id: String,
    /// 原始消息文本
    pub raw_text: String,
}

impl InboundMessageEvent {
    pub fn new(platform: Platform, external_sender_id: &str, raw_text: &str) -> Self {
        Self {
            platform,
            external_sender_id: external_sender_id.to_string(),
            raw_text: raw_text.to_string(),
        }
    }

    /// 校验发送者与文本均存在
    pub fn validate(&self) -> Result<()> {
        if self.external_sender_id.trim().is_empty() {
            return Err(AppError::Validation(
                "inbound message is missing sender id".to_string(),
            ));
        }

        if self.raw_text.trim().is_empty() {
            return Err(AppError::Validation(
                "inbound message is missing text".to_string(),
            ));
        }

        Ok(())
    }
}
