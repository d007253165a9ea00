use async_trait::async_trait;

use crate::error::Result;
use crate::models::binding::{Binding, Platform};

/// 绑定仓储 trait
///
/// 查询只读，可被多个分发并发调用。
#[async_trait]
pub trait BindingRepository: Send + Sync {
    /// 按平台和用户查找绑定，不存在时返回 `None`
    async fn find_binding(&self, platform: Platform, external_user_id: &str)
    -> Result<Option<Binding>>;

    /// 按平台 + 用户插入或覆盖绑定
    async fn save_binding(&self, binding: &Binding) -> Result<Binding>;
}
