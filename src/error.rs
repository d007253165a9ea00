//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::binding::Platform;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 入站消息格式错误或编码不支持
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 发送者没有配置绑定
    #[error("未找到绑定: platform={platform}, user={external_user_id}")]
    BindingNotFound {
        platform: Platform,
        external_user_id: String,
    },

    /// 文档数据库提交失败
    #[error("外部接口调用失败: {0}")]
    ExternalApi(#[source] Box<AppError>),

    /// 上游返回非成功状态
    #[error("上游服务返回 {status}: {message}")]
    Upstream { status: u16, message: String },

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(String),

    /// 连接错误
    #[error("连接错误: {0}")]
    Connection(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    Timeout(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),
}

impl AppError {
    /// 包装为外部接口错误
    pub fn external(cause: AppError) -> Self {
        AppError::ExternalApi(Box::new(cause))
    }

    pub fn binding_not_found(platform: Platform, external_user_id: &str) -> Self {
        AppError::BindingNotFound {
            platform,
            external_user_id: external_user_id.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e.to_string())
        } else if let Some(status) = e.status() {
            AppError::Upstream {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            AppError::Connection(e.to_string())
        }
    }
}

#[cfg(feature = "surrealdb")]
impl From<surrealdb::Error> for AppError {
    fn from(e: surrealdb::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code): (u16, String) = (&self).into();
        let mut response = ErrorResponse::new(&code, &self.to_string());
        if let AppError::ExternalApi(cause) = &self {
            response = response.with_details(&cause.to_string());
        }
        let body = Json(response);
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::BindingNotFound { .. } => (404, "BINDING_NOT_FOUND".to_string()),
            AppError::Timeout(_) => (408, "TIMEOUT".to_string()),
            AppError::ExternalApi(_) => (502, "EXTERNAL_API_ERROR".to_string()),
            AppError::Upstream { .. } => (502, "UPSTREAM_ERROR".to_string()),
            AppError::Connection(_) => (503, "SERVICE_UNAVAILABLE".to_string()),
            AppError::Database(_) => (500, "DATABASE_ERROR".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation("x".into()), 400),
            (AppError::binding_not_found(Platform::Lark, "ou_1"), 404),
            (AppError::external(AppError::Connection("refused".into())), 502),
            (AppError::Internal("x".into()), 500),
        ];

        for (err, expected) in cases {
            let (status, _): (u16, String) = (&err).into();
            assert_eq!(status, expected, "{}", err);
        }
    }

    #[test]
    fn test_external_api_keeps_cause() {
        let err = AppError::external(AppError::Upstream {
            status: 401,
            message: "unauthorized".into(),
        });

        let source = err.source().expect("cause should be preserved");
        assert!(source.to_string().contains("401"));
        assert!(err.to_string().contains("unauthorized"));
    }

    #[test]
    fn test_error_response_builder() {
        let response = ErrorResponse::new("BINDING_NOT_FOUND", "no binding")
            .with_details("lark/ou_1");

        assert_eq!(response.code, "BINDING_NOT_FOUND");
        assert_eq!(response.details.as_deref(), Some("lark/ou_1"));
    }
}
