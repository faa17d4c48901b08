//! tourbook - 旅游行程预约后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Tour Context: 行程、路线、预约与心愿
//! - User Context: 用户资料与评价
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TourRepository, UserRepository, ImageStorage）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API，统一 `{code, message, data}` 信封
//! - Persistence: SQLite 存储
//! - Memory: DashMap 内存仓储
//! - Adapters: 本地文件图片存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
