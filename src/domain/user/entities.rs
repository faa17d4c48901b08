//! User Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::tour::TourId;

/// 用户唯一标识
pub type UserId = i64;

/// 登录方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthType {
    Kakao,
    Google,
    #[default]
    Local,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Kakao => "KAKAO",
            AuthType::Google => "GOOGLE",
            AuthType::Local => "LOCAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "KAKAO" => Some(AuthType::Kakao),
            "GOOGLE" => Some(AuthType::Google),
            "LOCAL" => Some(AuthType::Local),
            _ => None,
        }
    }
}

/// 用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub nickname: String,
    pub profile_img: Option<String>,
    pub auth_type: AuthType,
    pub introduction: Option<String>,
}

/// 用户撰写的 Tour 评价
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,
    pub tour_id: TourId,
    pub tour_title: String,
    pub content: String,
    pub grade: f32,
    pub created_at: DateTime<Utc>,
}
