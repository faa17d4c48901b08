//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod tour_queries;
mod user_queries;

pub mod handlers;

pub use tour_queries::*;
pub use user_queries::*;
