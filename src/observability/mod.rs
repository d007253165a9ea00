//! 可观测性模块
//!
//! 提供结构化日志初始化和存活检查。

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::config::LoggingConfig;
use crate::error::{AppError, Result};

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的级别。配置了 `log_dir` 时额外写入按天滚动的日志文件，
/// 返回的 guard 需要在进程存活期间持有，否则缓冲中的日志会丢失。
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = if config.level.is_empty() {
        "info"
    } else {
        config.level.as_str()
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Config(format!("invalid log level {}: {}", level, e)))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let stdout: Box<dyn Layer<Registry> + Send + Sync> = if config.structured {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .boxed()
    };
    layers.push(stdout);

    let guard = match &config.log_dir {
        Some(dir) => {
            let prefix = if config.file_prefix.is_empty() {
                "nomo.log"
            } else {
                config.file_prefix.as_str()
            };
            let appender = tracing_appender::rolling::daily(dir, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| AppError::Config(format!("failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}

// ===== Health Check =====

/// 健康状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: i64,
}

/// 可观测性路由共享状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String) -> Self {
        Self {
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}

/// 平台回调地址连通性检查
pub async fn ping() -> impl IntoResponse {
    Json("ping succ")
}

/// 获取健康状态
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .with_state(state)
}
