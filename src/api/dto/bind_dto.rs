//! 绑定 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::binding::{Binding, Platform};

/// 绑定请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BindRequest {
    /// 平台用户 ID
    pub user_id: String,
    /// Notion integration 密钥
    pub secret_key: String,
    /// Notion 数据库 ID
    pub database_id: String,
}

/// 绑定响应，不回显密钥
#[derive(Debug, Serialize, Deserialize)]
pub struct BindResponse {
    pub platform: Platform,
    pub user_id: String,
    pub database_id: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Binding> for BindResponse {
    fn from(binding: Binding) -> Self {
        Self {
            platform: binding.platform,
            user_id: binding.external_user_id,
            database_id: binding.database_id,
            updated_at: binding.updated_at,
        }
    }
}
