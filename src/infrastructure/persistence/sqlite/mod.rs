//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod tour_repo;
mod user_repo;

pub use database::*;
pub use tour_repo::*;
pub use user_repo::*;
