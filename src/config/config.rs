use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 绑定存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 进程内存储，重启后丢失
    #[default]
    Memory,
    /// SurrealDB
    SurrealDB,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 存储后端
    pub backend: StorageBackend,
    /// SurrealDB 连接地址
    pub url: String,
    /// 命名空间
    pub namespace: String,
    /// 数据库名称
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 优雅退出等待时间（秒）
    pub shutdown_timeout: u64,
}

/// Notion 接口配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotionConfig {
    /// API 地址
    pub api_base_url: String,
    /// `Notion-Version` 请求头
    pub api_version: String,
    /// 请求超时（秒）
    pub request_timeout: u64,
    /// 标题属性名
    pub title_property: String,
    /// 标签属性名（multi-select）
    pub tags_property: String,
    /// 标题最大字符数
    pub title_max_chars: usize,
}

/// 分发配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// 查询绑定的超时（毫秒）
    pub resolve_timeout_ms: u64,
    /// 提交 Notion 页面的超时（毫秒）
    pub submit_timeout_ms: u64,
    /// 单条消息最大字符数，0 表示不限制
    pub max_text_chars: usize,
    /// 是否启用绑定缓存
    pub binding_cache_enabled: bool,
    /// 绑定缓存有效期（秒）
    pub binding_cache_ttl: u64,
}

impl DispatchConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn binding_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.binding_cache_ttl)
    }
}

/// 飞书配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LarkConfig {
    /// 事件订阅的 verification token，为空时不校验
    pub verification_token: String,
    /// 事件 ID 去重有效期（秒）
    pub event_dedup_ttl: u64,
}

impl LarkConfig {
    pub fn event_dedup_ttl(&self) -> Duration {
        Duration::from_secs(self.event_dedup_ttl)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录，为空时只输出到标准输出
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// Notion 配置
    pub notion: NotionConfig,
    /// 分发配置
    pub dispatch: DispatchConfig,
    /// 飞书配置
    pub lark: LarkConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: "ws://localhost:8000".into(),
                namespace: "nomo".into(),
                database: "bindings".into(),
                username: "root".into(),
                password: "root".into(),
            },
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
                shutdown_timeout: 5,
            },
            notion: NotionConfig {
                api_base_url: "https://api.notion.com".into(),
                api_version: "2022-06-28".into(),
                request_timeout: 30,
                title_property: "Name".into(),
                tags_property: "Tags".into(),
                title_max_chars: 32,
            },
            dispatch: DispatchConfig {
                resolve_timeout_ms: 3_000,
                submit_timeout_ms: 15_000,
                max_text_chars: 0,
                binding_cache_enabled: false,
                binding_cache_ttl: 300,
            },
            lark: LarkConfig {
                verification_token: String::new(),
                event_dedup_ttl: 600,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
                file_prefix: "nomo.log".into(),
            },
            app_name: "nomo".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.database.backend = StorageBackend::SurrealDB;
        config.dispatch.binding_cache_enabled = true;
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("/var/log/nomo"));
        config
    }
}
