//! 飞书事件回调 DTO
//!
//! 只解析分发需要的字段，其余字段忽略。

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::binding::Platform;
use crate::models::message::{InboundMessageEvent, decode_utf8};

const URL_VERIFICATION: &str = "url_verification";
const TEXT_MESSAGE: &str = "text";

/// 飞书事件回调请求（2.0 schema，兼容 url_verification 握手）
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LarkEventRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub challenge: Option<String>,
    pub token: Option<String>,
    pub header: Option<LarkEventHeader>,
    pub event: Option<LarkMessageEvent>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LarkEventHeader {
    pub event_id: String,
    pub event_type: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LarkMessageEvent {
    pub sender: LarkSender,
    pub message: LarkMessage,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LarkSender {
    pub sender_id: LarkSenderId,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LarkSenderId {
    pub user_id: Option<String>,
    pub open_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LarkMessage {
    pub message_id: String,
    pub message_type: String,
    /// JSON 编码的消息内容，文本消息为 `{"text":"..."}`
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct LarkTextContent {
    text: String,
}

impl LarkEventRequest {
    /// 解析回调请求体，编码或 JSON 错误都按校验失败处理
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_str(decode_utf8(body)?)
            .map_err(|e| AppError::Validation(format!("invalid lark callback body: {}", e)))
    }

    pub fn is_url_verification(&self) -> bool {
        self.kind.as_deref() == Some(URL_VERIFICATION)
    }

    /// 握手请求的 token 在顶层，事件回调的 token 在 header 中
    pub fn verification_token(&self) -> Option<&str> {
        self.header
            .as_ref()
            .map(|h| h.token.as_str())
            .or(self.token.as_deref())
    }

    pub fn event_id(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.event_id.as_str())
    }

    /// 转换为入站消息事件
    ///
    /// 发送者优先取 user_id，没有权限获取时退回 open_id。
    pub fn into_inbound_event(self) -> Result<InboundMessageEvent> {
        let event = self
            .event
            .ok_or_else(|| AppError::Validation("lark callback has no event".to_string()))?;

        if event.message.message_type != TEXT_MESSAGE {
            return Err(AppError::Validation(format!(
                "unsupported lark message type: {}",
                event.message.message_type
            )));
        }

        let content: LarkTextContent = serde_json::from_str(&event.message.content)
            .map_err(|e| AppError::Validation(format!("invalid lark text content: {}", e)))?;

        let sender_id = event.sender.sender_id;
        let sender = sender_id
            .user_id
            .filter(|id| !id.is_empty())
            .or(sender_id.open_id)
            .unwrap_or_default();

        Ok(InboundMessageEvent::new(Platform::Lark, &sender, &content.text))
    }
}

/// url_verification 握手响应
#[derive(Debug, Serialize)]
pub struct LarkChallengeResponse {
    pub challenge: String,
}

/// 消息处理成功响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageAckResponse {
    pub code: i32,
    pub msg: String,
}

impl MessageAckResponse {
    pub fn ok() -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
        }
    }
}
