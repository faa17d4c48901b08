//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 图片存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 分页配置
    #[serde(default)]
    pub paging: PagingConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/tourbook.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 图片存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传图片存储目录
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// 图片对外 URL 前缀，同时作为静态文件路由
    #[serde(default = "default_image_url_prefix")]
    pub image_url_prefix: String,

    /// 单张图片最大大小（字节），默认 10MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("data/images")
}

fn default_image_url_prefix() -> String {
    "/images".to_string()
}

fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            image_url_prefix: default_image_url_prefix(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 分页配置
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    /// Tour 列表默认每页数量
    #[serde(default = "default_list_size")]
    pub list_default_size: u32,

    /// Tour 搜索默认每页数量
    #[serde(default = "default_search_size")]
    pub search_default_size: u32,

    /// 每页数量上限
    #[serde(default = "default_max_page_size")]
    pub max_size: u32,
}

fn default_list_size() -> u32 {
    6
}

fn default_search_size() -> u32 {
    18
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            list_default_size: default_list_size(),
            search_default_size: default_search_size(),
            max_size: default_max_page_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "data/tourbook.db");
        assert_eq!(config.storage.image_url_prefix, "/images");
        assert_eq!(config.paging.list_default_size, 6);
        assert_eq!(config.paging.search_default_size, 18);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/tourbook.db?mode=rwc");
    }
}
