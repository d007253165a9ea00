//! 绑定服务
//!
//! 查询发送者的 Notion 绑定，以及处理平台用户的绑定请求。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::binding::{Binding, BindingKey, Platform};
use crate::storage::repository::BindingRepository;

/// 绑定解析 trait
#[async_trait]
pub trait BindingResolver: Send + Sync {
    /// 查找绑定，不存在时返回 `AppError::BindingNotFound`
    async fn resolve(&self, platform: Platform, external_user_id: &str) -> Result<Binding>;
}

/// 绑定缓存
///
/// 读多写少，基于分片哈希表，读取不会阻塞写入。克隆后共享同一份数据。
///
/// 每个键带一个代数，`invalidate` 会使其加一。查询仓储前先取代数，回填时代数
/// 已变化说明期间发生过重新绑定，此时放弃回填。
#[derive(Clone)]
pub struct BindingCache {
    entries: Arc<DashMap<BindingKey, CacheSlot>>,
    ttl: Duration,
}

#[derive(Default)]
struct CacheSlot {
    generation: u64,
    cached: Option<(Binding, Instant)>,
}

impl BindingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &BindingKey) -> Option<Binding> {
        let mut slot = self.entries.get_mut(key)?;
        let fresh = slot
            .cached
            .as_ref()
            .filter(|(_, cached_at)| cached_at.elapsed() < self.ttl)
            .map(|(binding, _)| binding.clone());
        if fresh.is_none() {
            slot.cached = None;
        }
        fresh
    }

    /// 当前代数，回填前需要先取
    pub fn generation(&self, key: &BindingKey) -> u64 {
        self.entries.get(key).map_or(0, |slot| slot.generation)
    }

    /// 代数未变化时写入缓存，返回是否写入
    pub fn insert_if_current(&self, binding: Binding, generation: u64) -> bool {
        let mut slot = self.entries.entry(binding.key()).or_default();
        if slot.generation != generation {
            return false;
        }
        slot.cached = Some((binding, Instant::now()));
        true
    }

    pub fn invalidate(&self, key: &BindingKey) {
        let mut slot = self.entries.entry(key.clone()).or_default();
        slot.generation += 1;
        slot.cached = None;
    }
}

/// 绑定解析实现
pub struct BindingResolverImpl {
    repository: Arc<dyn BindingRepository>,
    cache: Option<BindingCache>,
}

impl BindingResolverImpl {
    pub fn new(repository: Arc<dyn BindingRepository>) -> Self {
        Self {
            repository,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: BindingCache) -> Self {
        self.cache = Some(cache);
        self
    }
}

#[async_trait]
impl BindingResolver for BindingResolverImpl {
    async fn resolve(&self, platform: Platform, external_user_id: &str) -> Result<Binding> {
        let key = BindingKey::new(platform, external_user_id);
        if let Some(binding) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            debug!("Binding cache hit: {}", key.record_id());
            return Ok(binding);
        }

        let generation = self.cache.as_ref().map(|c| c.generation(&key));
        let binding = self
            .repository
            .find_binding(platform, external_user_id)
            .await?
            .ok_or_else(|| AppError::binding_not_found(platform, external_user_id))?;

        if let (Some(cache), Some(generation)) = (&self.cache, generation) {
            if !cache.insert_if_current(binding.clone(), generation) {
                debug!("Binding changed during lookup, not cached: {}", key.record_id());
            }
        }
        Ok(binding)
    }
}

/// 绑定请求处理 trait
#[async_trait]
pub trait BindService: Send + Sync {
    /// 为平台用户绑定 Notion 密钥和数据库，已存在时覆盖
    async fn bind(
        &self,
        platform: Platform,
        external_user_id: &str,
        secret_key: &str,
        database_id: &str,
    ) -> Result<Binding>;
}

/// 绑定请求处理实现
pub struct BindServiceImpl {
    repository: Arc<dyn BindingRepository>,
    cache: Option<BindingCache>,
}

impl BindServiceImpl {
    pub fn new(repository: Arc<dyn BindingRepository>, cache: Option<BindingCache>) -> Self {
        Self { repository, cache }
    }
}

#[async_trait]
impl BindService for BindServiceImpl {
    async fn bind(
        &self,
        platform: Platform,
        external_user_id: &str,
        secret_key: &str,
        database_id: &str,
    ) -> Result<Binding> {
        for (field, value) in [
            ("user_id", external_user_id),
            ("secret_key", secret_key),
            ("database_id", database_id),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
        }

        let binding = Binding::new(platform, external_user_id, secret_key.trim(), database_id.trim());
        let saved = self.repository.save_binding(&binding).await?;

        if let Some(cache) = &self.cache {
            cache.invalidate(&saved.key());
        }
        info!("Bound {} user {} to database {}", platform, saved.external_user_id, saved.database_id);
        Ok(saved)
    }
}

/// 创建绑定解析服务
pub fn create_binding_resolver(
    repository: Arc<dyn BindingRepository>,
    cache: Option<BindingCache>,
) -> Arc<dyn BindingResolver> {
    let resolver = BindingResolverImpl::new(repository);
    match cache {
        Some(cache) => Arc::new(resolver.with_cache(cache)),
        None => Arc::new(resolver),
    }
}

/// 创建绑定请求处理服务
pub fn create_bind_service(
    repository: Arc<dyn BindingRepository>,
    cache: Option<BindingCache>,
) -> Arc<dyn BindService> {
    Arc::new(BindServiceImpl::new(repository, cache))
}
