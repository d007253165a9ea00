//! 进程内绑定仓储
//!
//! 用于开发环境和测试，重启后数据丢失。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::binding::{Binding, BindingKey, Platform};
use crate::storage::repository::BindingRepository;

#[derive(Clone, Default)]
pub struct InMemoryBindingRepository {
    bindings: Arc<DashMap<BindingKey, Binding>>,
}

impl InMemoryBindingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[async_trait]
impl BindingRepository for InMemoryBindingRepository {
    async fn find_binding(
        &self,
        platform: Platform,
        external_user_id: &str,
    ) -> Result<Option<Binding>> {
        let key = BindingKey::new(platform, external_user_id);
        Ok(self.bindings.get(&key).map(|entry| entry.value().clone()))
    }

    async fn save_binding(&self, binding: &Binding) -> Result<Binding> {
        let saved = self
            .bindings
            .entry(binding.key())
            .and_modify(|existing| existing.refresh(&binding.secret_key, &binding.database_id))
            .or_insert_with(|| binding.clone());
        Ok(saved.value().clone())
    }
}
