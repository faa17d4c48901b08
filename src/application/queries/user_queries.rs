//! User Queries

use crate::domain::user::UserId;

/// 获取用户资料查询
#[derive(Debug, Clone)]
pub struct GetUserInfo {
    pub user_id: UserId,
}
