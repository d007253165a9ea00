//! API 模块
//!
//! 提供平台回调和绑定的 REST API。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use axum::{Router, http::Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::bind_routes::create_bind_router())
        .merge(routes::message_routes::create_message_router());

    Router::new()
        .nest("/api/v1", api)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(12 * 60 * 60))
}
