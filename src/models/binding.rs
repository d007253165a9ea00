//! 绑定数据模型
//!
//! 记录聊天平台用户与 Notion 数据库凭据之间的映射关系。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 消息来源平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// 微信
    #[serde(rename = "wechat")]
    WeChat,

    /// 飞书
    #[serde(rename = "lark")]
    Lark,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WeChat => "wechat",
            Platform::Lark => "lark",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wechat" | "wx" => Ok(Platform::WeChat),
            "lark" | "feishu" => Ok(Platform::Lark),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// 规整平台用户 ID，存储和查询都经过这里
pub fn normalize_user_id(external_user_id: &str) -> &str {
    external_user_id.trim()
}

/// 绑定记录
///
/// 由仓储层持久化，核心流程只读。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// 来源平台
    pub platform: Platform,

    /// 平台侧的用户标识
    pub external_user_id: String,

    /// Notion integration 密钥
    pub secret_key: String,

    /// 目标 Notion 数据库 ID
    pub database_id: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}

impl Binding {
    /// 创建新绑定
    pub fn new(
        platform: Platform,
        external_user_id: &str,
        secret_key: &str,
        database_id: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            platform,
            external_user_id: normalize_user_id(external_user_id).to_string(),
            secret_key: secret_key.to_string(),
            database_id: database_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 仓储主键：平台 + 用户
    pub fn key(&self) -> BindingKey {
        BindingKey::new(self.platform, &self.external_user_id)
    }

    /// 用新的凭据覆盖，保留创建时间
    pub fn refresh(&mut self, secret_key: &str, database_id: &str) {
        self.secret_key = secret_key.to_string();
        self.database_id = database_id.to_string();
        self.updated_at = Utc::now();
    }
}

/// 绑定查找键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub platform: Platform,
    pub external_user_id: String,
}

impl BindingKey {
    pub fn new(platform: Platform, external_user_id: &str) -> Self {
        Self {
            platform,
            external_user_id: normalize_user_id(external_user_id).to_string(),
        }
    }

    /// 作为存储记录 ID 使用的字符串形式
    pub fn record_id(&self) -> String {
        format!("{}_{}", self.platform, self.external_user_id)
    }
}
