use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::{
    api::{app_state::AppState, dto::message_dto::*},
    error::AppError,
};

/// 飞书事件回调
///
/// 先完成 url_verification 握手，其余回调解析成入站消息后同步分发。
/// 同一事件 ID 在有效期内只分发一次，分发失败时允许重投。
pub async fn handle_lark_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = LarkEventRequest::from_slice(&body)?;

    if !state.lark_verification_token.is_empty()
        && request.verification_token() != Some(state.lark_verification_token.as_str())
    {
        return Err(AppError::Validation(
            "lark verification token mismatch".to_string(),
        ));
    }

    if request.is_url_verification() {
        let challenge = request.challenge.unwrap_or_default();
        return Ok(Json(LarkChallengeResponse { challenge }).into_response());
    }

    let event_id = request
        .event_id()
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    debug!("Lark event {:?}", event_id);
    let event = request.into_inbound_event()?;

    if let Some(id) = &event_id {
        if !state.lark_events.try_begin(id) {
            info!("Lark event {} already handled, skipping", id);
            return Ok(Json(MessageAckResponse::ok()).into_response());
        }
    }

    if let Err(e) = state.dispatcher.handle(&event).await {
        if let Some(id) = &event_id {
            state.lark_events.forget(id);
        }
        return Err(e);
    }

    Ok(Json(MessageAckResponse::ok()).into_response())
}
