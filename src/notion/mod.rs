//! Notion 客户端
//!
//! 只负责把组装好的请求提交到 Notion，不做重试。

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::config::NotionConfig;
use crate::error::{AppError, Result};
use crate::services::composer::PageCreateRequest;

/// 文档数据库客户端
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// 在目标数据库中创建页面
    async fn create_page(
        &self,
        secret_key: &str,
        database_id: &str,
        request: &PageCreateRequest,
    ) -> Result<()>;
}

/// Notion 错误响应
#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Notion HTTP 客户端
#[derive(Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }
}

#[async_trait]
impl DocumentClient for NotionClient {
    async fn create_page(
        &self,
        secret_key: &str,
        database_id: &str,
        request: &PageCreateRequest,
    ) -> Result<()> {
        debug!(
            "Creating Notion page in database {} with {} blocks",
            database_id,
            request.children.len()
        );

        let response = self
            .client
            .post(format!("{}/v1/pages", self.base_url))
            .bearer_auth(secret_key)
            .header("Notion-Version", &self.api_version)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<NotionErrorBody>(&text) {
                Ok(NotionErrorBody {
                    code: Some(code),
                    message: Some(message),
                }) => format!("{}: {}", code, message),
                _ => text,
            };
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
