//! Bearer Token 认证
//!
//! 只负责把 `Authorization: Bearer <token>` 解析为用户，令牌由账户系统签发

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::domain::user::User;

/// 从 Authorization 头中取出 Bearer 令牌
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, ApiError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header format".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::Unauthorized("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// 当前登录用户
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = extract_bearer_token(header)?;

        let user = state
            .user_repo
            .find_by_token(token)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        tracing::debug!(user_id = user.id, "Principal resolved");

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert_eq!(extract_bearer_token("Bearer  abc  ").unwrap(), "abc");
    }

    #[test]
    fn test_extract_bearer_token_rejects_malformed() {
        for header in ["Basic abc", "bearer abc", "Bearer ", "Bearer    ", "abc"] {
            assert!(matches!(
                extract_bearer_token(header),
                Err(ApiError::Unauthorized(_))
            ));
        }
    }
}
