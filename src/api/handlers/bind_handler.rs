use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::bind_dto::*},
    error::AppError,
    models::binding::Platform,
};

async fn bind(
    state: &AppState,
    platform: Platform,
    request: BindRequest,
) -> Result<Json<BindResponse>, AppError> {
    debug!("Binding {} user {}", platform, request.user_id);

    let binding = state
        .bind_service
        .bind(
            platform,
            &request.user_id,
            &request.secret_key,
            &request.database_id,
        )
        .await?;

    Ok(Json(BindResponse::from(binding)))
}

pub async fn bind_wechat(
    State(state): State<AppState>,
    Json(request): Json<BindRequest>,
) -> Result<impl IntoResponse, AppError> {
    bind(&state, Platform::WeChat, request).await
}

pub async fn bind_lark(
    State(state): State<AppState>,
    Json(request): Json<BindRequest>,
) -> Result<impl IntoResponse, AppError> {
    bind(&state, Platform::Lark, request).await
}
