//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Tour Context: 旅游行程、课程、预约与心愿
//! - User Context: 用户资料（只读）

pub mod tour;
pub mod user;
