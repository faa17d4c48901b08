//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `TOURBOOK_SERVER__PORT=9000`
/// - `TOURBOOK_DATABASE__PATH=/data/tourbook.db`
/// - `TOURBOOK_STORAGE__IMAGE_DIR=/data/images`
/// - `TOURBOOK_PAGING__LIST_DEFAULT_SIZE=12`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时按 `CONFIG_FILE_NAMES` 搜索当前目录
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.path", "data/tourbook.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.image_dir", "data/images")?
        .set_default("storage.image_url_prefix", "/images")?
        .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
        .set_default("paging.list_default_size", 6)?
        .set_default("paging.search_default_size", 18)?
        .set_default("paging.max_size", 100)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("TOURBOOK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    let prefix = &config.storage.image_url_prefix;
    if !prefix.starts_with('/') || prefix.len() < 2 {
        return Err(ConfigError::ValidationError(format!(
            "Image URL prefix must be a non-root path starting with '/': {}",
            prefix
        )));
    }

    let paging = &config.paging;
    if paging.max_size == 0 {
        return Err(ConfigError::ValidationError(
            "Maximum page size cannot be 0".to_string(),
        ));
    }
    for (name, size) in [
        ("list_default_size", paging.list_default_size),
        ("search_default_size", paging.search_default_size),
    ] {
        if size == 0 || size > paging.max_size {
            return Err(ConfigError::ValidationError(format!(
                "paging.{} must be between 1 and {}",
                name, paging.max_size
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!(
        "Image Directory: {:?} (served at {})",
        config.storage.image_dir,
        config.storage.image_url_prefix
    );
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!(
        "Paging: list={}, search={}, max={}",
        config.paging.list_default_size,
        config.paging.search_default_size,
        config.paging.max_size
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_default_above_max() {
        let mut config = AppConfig::default();
        config.paging.max_size = 10;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.paging.list_default_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_image_prefix() {
        let mut config = AppConfig::default();
        config.storage.image_url_prefix = "images".to_string();
        assert!(validate_config(&config).is_err());

        config.storage.image_url_prefix = "/".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[paging]\nlist_default_size = 12"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.paging.list_default_size, 12);
        assert_eq!(config.paging.search_default_size, 18);
        assert_eq!(config.database.path, "data/tourbook.db");
    }
}
