//! 存储工厂模块
//!
//! 根据配置创建相应的绑定仓储。

use std::sync::Arc;

use crate::config::config::{DatabaseConfig, StorageBackend};
use crate::error::{AppError, Result};
use crate::storage::memory::InMemoryBindingRepository;
use crate::storage::repository::BindingRepository;

#[cfg(feature = "surrealdb")]
use crate::storage::surrealdb::{SurrealBindingRepository, SurrealPool};

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建绑定仓储
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn BindingRepository>> {
        match config.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory binding storage, bindings are lost on restart");
                Ok(Arc::new(InMemoryBindingRepository::new()))
            }
            #[cfg(feature = "surrealdb")]
            StorageBackend::SurrealDB => {
                let pool = SurrealPool::new(config.clone())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                tracing::info!(
                    "Connected to SurrealDB at {} ({}/{})",
                    pool.config().url,
                    pool.config().namespace,
                    pool.config().database
                );
                Ok(Arc::new(SurrealBindingRepository::new(&pool)))
            }
            #[cfg(not(feature = "surrealdb"))]
            StorageBackend::SurrealDB => Err(AppError::Config(
                "SurrealDB feature is not enabled. Enable 'surrealdb' feature to use it.".into(),
            )),
        }
    }
}
