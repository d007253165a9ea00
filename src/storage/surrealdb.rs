use async_trait::async_trait;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};

use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::binding::{Binding, BindingKey, Platform};
use crate::storage::repository::BindingRepository;

const BINDING_TABLE: &str = "binding";

/// SurrealDB 连接
#[derive(Clone)]
pub struct SurrealPool {
    /// 数据库连接
    db: Surreal<Any>,
    /// 连接配置
    config: DatabaseConfig,
}

impl SurrealPool {
    /// 建立连接并选择命名空间和数据库
    pub async fn new(config: DatabaseConfig) -> std::result::Result<Self, surrealdb::Error> {
        let db: Surreal<Any> = connect(&config.url).await?;

        // 认证
        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Ok(Self { db, config })
    }

    /// 获取内部数据库实例
    pub fn inner(&self) -> Surreal<Any> {
        self.db.clone()
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

/// 基于 SurrealDB 的绑定仓储
///
/// 记录 ID 为 `{platform}_{external_user_id}`，一个平台用户只有一条绑定。
#[derive(Clone)]
pub struct SurrealBindingRepository {
    db: Surreal<Any>,
}

impl SurrealBindingRepository {
    pub fn new(pool: &SurrealPool) -> Self {
        Self { db: pool.inner() }
    }
}

#[async_trait]
impl BindingRepository for SurrealBindingRepository {
    async fn find_binding(
        &self,
        platform: Platform,
        external_user_id: &str,
    ) -> Result<Option<Binding>> {
        let key = BindingKey::new(platform, external_user_id);
        let found: Option<Binding> = self.db.select((BINDING_TABLE, key.record_id())).await?;
        Ok(found)
    }

    async fn save_binding(&self, binding: &Binding) -> Result<Binding> {
        let record = match self
            .find_binding(binding.platform, &binding.external_user_id)
            .await?
        {
            Some(mut existing) => {
                existing.refresh(&binding.secret_key, &binding.database_id);
                existing
            }
            None => binding.clone(),
        };

        let record_id = record.key().record_id();
        let saved: Option<Binding> = self
            .db
            .upsert((BINDING_TABLE, record_id.clone()))
            .content(record)
            .await?;

        saved.ok_or_else(|| AppError::Database(format!("Failed to save binding: {}", record_id)))
    }
}
