use crate::config::config::{AppConfig, StorageBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 环境变量前缀，嵌套字段用 `__` 分隔，如 `NOMO_SERVER__PORT`
const ENV_PREFIX: &str = "NOMO_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 默认值（`NOMO_ENVIRONMENT=production` 时使用生产环境默认值）
    /// 2. ./config.toml
    /// 3. 环境变量
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        let defaults = match std::env::var("NOMO_ENVIRONMENT").as_deref() {
            Ok("production") => AppConfig::production(),
            _ => AppConfig::development(),
        };

        Figment::from(Serialized::defaults(defaults))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.database.backend == StorageBackend::SurrealDB && config.database.url.is_empty() {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if config.notion.api_base_url.is_empty() {
            return Err(ConfigValidationError::MissingNotionUrl);
        }

        if config.dispatch.resolve_timeout_ms == 0 || config.dispatch.submit_timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("数据库连接 URL 未配置")]
    MissingDatabaseUrl,

    #[error("Notion API 地址未配置")]
    MissingNotionUrl,

    #[error("分发超时必须大于 0")]
    InvalidTimeout,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load()?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.notion.tags_property, "Tags");
            assert!(ConfigLoader::validate(&config).is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                environment = "staging"

                [server]
                port = 9000

                [notion]
                tags_property = "标签"
                "#,
            )?;
            jail.set_env("NOMO_SERVER__PORT", "9100");
            jail.set_env("NOMO_DISPATCH__MAX_TEXT_CHARS", "500");

            let config = ConfigLoader::load()?;
            assert_eq!(config.environment, "staging");
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.notion.tags_property, "标签");
            assert_eq!(config.dispatch.max_text_chars, 500);
            // 未覆盖的字段保留默认值
            assert_eq!(config.notion.title_property, "Name");
            Ok(())
        });
    }

    #[test]
    fn test_production_defaults_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("NOMO_ENVIRONMENT", "production");

            let config = ConfigLoader::load()?;
            assert_eq!(config.environment, "production");
            assert_eq!(config.database.backend, StorageBackend::SurrealDB);
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::development();
        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPort)
        ));

        let mut config = AppConfig::development();
        config.database.backend = StorageBackend::SurrealDB;
        config.database.url.clear();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingDatabaseUrl)
        ));

        let mut config = AppConfig::development();
        config.dispatch.submit_timeout_ms = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }
}
