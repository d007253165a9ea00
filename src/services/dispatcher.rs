//! 消息分发
//!
//! 一次分发处理一条入站消息：校验 → 扫描标签 → 查询绑定 → 组装页面 → 提交 Notion。
//! 分发器本身无状态，每次调用相互独立。

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::config::DispatchConfig;
use crate::error::{AppError, Result};
use crate::models::binding::Binding;
use crate::models::memo::Memo;
use crate::models::message::InboundMessageEvent;
use crate::notify::Notifier;
use crate::notion::DocumentClient;
use crate::services::binding::BindingResolver;
use crate::services::composer::PageComposer;
use crate::services::scanner::scan;

/// 分发器配置
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// 查询绑定的截止时间
    pub resolve_timeout: Duration,
    /// 提交页面的截止时间
    pub submit_timeout: Duration,
    /// 单条消息最大字符数，0 表示不限制
    pub max_text_chars: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(3),
            submit_timeout: Duration::from_secs(15),
            max_text_chars: 0,
        }
    }
}

impl From<&DispatchConfig> for DispatcherConfig {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            resolve_timeout: config.resolve_timeout(),
            submit_timeout: config.submit_timeout(),
            max_text_chars: config.max_text_chars,
        }
    }
}

/// 消息分发器
pub struct Dispatcher {
    resolver: Arc<dyn BindingResolver>,
    composer: PageComposer,
    client: Arc<dyn DocumentClient>,
    notifier: Arc<dyn Notifier>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        resolver: Arc<dyn BindingResolver>,
        composer: PageComposer,
        client: Arc<dyn DocumentClient>,
        notifier: Arc<dyn Notifier>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            resolver,
            composer,
            client,
            notifier,
            config,
        }
    }

    /// 处理一条入站消息
    ///
    /// 没有绑定时直接返回 `BindingNotFound`，不发告警；提交 Notion 失败时先告警，
    /// 再返回 `ExternalApi`。
    pub async fn handle(&self, event: &InboundMessageEvent) -> Result<()> {
        event.validate()?;
        if self.config.max_text_chars > 0 {
            let chars = event.raw_text.chars().count();
            if chars > self.config.max_text_chars {
                return Err(AppError::Validation(format!(
                    "message text too long: {} chars (max {})",
                    chars, self.config.max_text_chars
                )));
            }
        }

        let memo = Memo::new(event, scan(&event.raw_text));
        debug!(
            "Dispatch {}: {} chars, {} segments, tags={:?}",
            memo.id,
            memo.raw_text.chars().count(),
            memo.segments.len(),
            memo.tags()
        );

        let binding = self.resolve(&memo).await?;
        let request = self.composer.compose(&binding, &memo.segments);

        let submitted = tokio::time::timeout(
            self.config.submit_timeout,
            self.client
                .create_page(&binding.secret_key, &binding.database_id, &request),
        )
        .await
        .unwrap_or_else(|_| {
            Err(AppError::Timeout(format!(
                "create page did not finish within {:?}",
                self.config.submit_timeout
            )))
        });

        if let Err(cause) = submitted {
            warn!(
                "Dispatch {} (received {}) failed to create page: {}",
                memo.id,
                memo.received_at.to_rfc3339(),
                cause
            );
            self.notifier.notify(&format!(
                "[nomo] failed to save memo from {} user {} to database {}: {}",
                memo.source_platform, memo.sender_external_id, binding.database_id, cause
            ));
            return Err(AppError::external(cause));
        }

        info!(
            "Dispatch {} saved memo from {} user {} ({} segments, received {})",
            memo.id,
            memo.source_platform,
            memo.sender_external_id,
            memo.segments.len(),
            memo.received_at.to_rfc3339()
        );
        Ok(())
    }

    async fn resolve(&self, memo: &Memo) -> Result<Binding> {
        let resolved = tokio::time::timeout(
            self.config.resolve_timeout,
            self.resolver
                .resolve(memo.source_platform, &memo.sender_external_id),
        )
        .await
        .map_err(|_| {
            AppError::Timeout(format!(
                "binding lookup did not finish within {:?}",
                self.config.resolve_timeout
            ))
        })?;

        if let Err(AppError::BindingNotFound { .. }) = &resolved {
            info!(
                "Dispatch {}: no binding for {} user {}",
                memo.id, memo.source_platform, memo.sender_external_id
            );
        }
        resolved
    }
}
