//! User Context - 用户限界上下文
//!
//! 用户由外部认证系统创建，这里只负责读取

mod entities;

pub use entities::{AuthType, Review, User, UserId};
