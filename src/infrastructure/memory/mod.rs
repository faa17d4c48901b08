//! Memory Layer - In-Memory Repositories
//!
//! 基于 DashMap 的仓储实现，用于测试和无数据库运行

mod tour_repo;
mod user_repo;

pub use tour_repo::InMemoryTourRepository;
pub use user_repo::InMemoryUserRepository;
