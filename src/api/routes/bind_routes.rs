//! Bind Routes

use crate::api::handlers::bind_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建绑定路由器
pub fn create_bind_router() -> Router<AppState> {
    Router::new()
        .route("/bind/wx", post(bind_wechat))
        .route("/bind/lark", post(bind_lark))
}
