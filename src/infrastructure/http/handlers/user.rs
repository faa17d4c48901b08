//! User HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::GetUserInfo;
use crate::domain::user::UserId;
use crate::infrastructure::http::auth::AuthUser;
use crate::infrastructure::http::dto::{Envelope, UserInfoResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiPath;
use crate::infrastructure::http::state::AppState;

async fn load_user_info(
    state: &AppState,
    user_id: UserId,
) -> Result<Json<Envelope<UserInfoResponse>>, ApiError> {
    let info = state
        .get_user_info_handler
        .handle(GetUserInfo { user_id })
        .await?;

    Ok(Json(Envelope::ok(
        "User info loaded successfully!",
        UserInfoResponse::from(info),
    )))
}

/// 获取用户资料
pub async fn get_user_info(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Envelope<UserInfoResponse>>, ApiError> {
    load_user_info(&state, user_id).await
}

/// 获取当前用户资料
pub async fn get_my_info(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Envelope<UserInfoResponse>>, ApiError> {
    load_user_info(&state, user.id).await
}
