//! Data Transfer Objects
//!
//! 所有字段以 camelCase 序列化

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{Page, TourDetail, TourSearchCriteria, UserInfo};
use crate::domain::tour::{Course, Tour, TourId, TourStatus};
use crate::domain::user::{AuthType, Review, User, UserId};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
///
/// `code` 为字符串形式的 HTTP 状态码，命令类接口的 `data` 为 null
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(code: impl Into<String>, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data,
        }
    }

    /// 成功响应
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new("200", message, Some(data))
    }
}

impl Envelope<()> {
    /// 成功但无数据
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new("200", message, None)
    }
}

// ============================================================================
// Tour DTOs
// ============================================================================

/// Tour 完整信息（注册、修改接口返回）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourResponse {
    pub tour_id: TourId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub region: String,
    pub categories: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_member: u32,
    pub max_member: u32,
    pub price: u32,
    pub courses: Vec<Course>,
    pub image_urls: Vec<String>,
    pub link: Option<String>,
    pub status: TourStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Tour> for TourResponse {
    fn from(tour: &Tour) -> Self {
        let content = tour.content();
        Self {
            tour_id: tour.id(),
            author_id: tour.author_id(),
            title: content.title.clone(),
            content: content.content.clone(),
            region: content.region.clone(),
            categories: content.categories.clone(),
            start_date: content.schedule.start(),
            end_date: content.schedule.end(),
            min_member: content.members.min(),
            max_member: content.members.max(),
            price: content.price,
            courses: content.courses.as_slice().to_vec(),
            image_urls: content.image_urls.clone(),
            link: tour.link().map(str::to_string),
            status: tour.status(),
            created_at: tour.created_at(),
            updated_at: tour.updated_at(),
        }
    }
}

/// 作者摘要
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub user_id: UserId,
    pub nickname: String,
    pub profile_img: Option<String>,
    pub introduction: Option<String>,
}

impl From<&User> for AuthorResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            nickname: user.nickname.clone(),
            profile_img: user.profile_img.clone(),
            introduction: user.introduction.clone(),
        }
    }
}

/// Tour 详情
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDetailResponse {
    #[serde(flatten)]
    pub tour: TourResponse,
    pub author: Option<AuthorResponse>,
    pub wish_count: usize,
    pub reservation_count: usize,
}

impl From<&TourDetail> for TourDetailResponse {
    fn from(detail: &TourDetail) -> Self {
        Self {
            tour: TourResponse::from(&detail.tour),
            author: detail.author.as_ref().map(AuthorResponse::from),
            wish_count: detail.tour.wished_user_ids().len(),
            reservation_count: detail.tour.reserved_user_ids().len(),
        }
    }
}

/// Tour 列表项（列表与搜索结果共用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSummaryResponse {
    pub tour_id: TourId,
    pub author_id: UserId,
    pub title: String,
    pub region: String,
    pub categories: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: u32,
    pub thumbnail: Option<String>,
    pub status: TourStatus,
    pub wish_count: usize,
    pub reservation_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Tour> for TourSummaryResponse {
    fn from(tour: &Tour) -> Self {
        let content = tour.content();
        Self {
            tour_id: tour.id(),
            author_id: tour.author_id(),
            title: content.title.clone(),
            region: content.region.clone(),
            categories: content.categories.clone(),
            start_date: content.schedule.start(),
            end_date: content.schedule.end(),
            price: content.price,
            thumbnail: content.image_urls.first().cloned(),
            status: tour.status(),
            wish_count: tour.wished_user_ids().len(),
            reservation_count: tour.reserved_user_ids().len(),
            created_at: tour.created_at(),
        }
    }
}

/// 分页 Tour 列表
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourListResponse {
    pub tours: Vec<TourSummaryResponse>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl From<Page<Tour>> for TourListResponse {
    fn from(page: Page<Tour>) -> Self {
        let total_pages = page.total_pages();
        let last = page.is_last();
        Self {
            tours: page.items.iter().map(TourSummaryResponse::from).collect(),
            page: page.request.page,
            size: page.request.size,
            total_elements: page.total_elements,
            total_pages,
            last,
        }
    }
}

/// 搜索条件请求体
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchTourRequest {
    pub keyword: Option<String>,
    pub region: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<SearchTourRequest> for TourSearchCriteria {
    fn from(request: SearchTourRequest) -> Self {
        Self {
            keyword: request.keyword,
            region: request.region,
            category: request.category,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }
}

/// 链接登记请求体
#[derive(Debug, Deserialize)]
pub struct TourLinkRequest {
    pub link: String,
}

// ============================================================================
// User DTOs
// ============================================================================

/// 用户评价
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: i64,
    pub tour_id: TourId,
    pub tour_title: String,
    pub content: String,
    pub grade: f32,
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            review_id: review.id,
            tour_id: review.tour_id,
            tour_title: review.tour_title.clone(),
            content: review.content.clone(),
            grade: review.grade,
            created_at: review.created_at,
        }
    }
}

/// 用户资料
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub user_id: UserId,
    pub email: String,
    pub nickname: String,
    pub categories: Vec<String>,
    pub profile_img: Option<String>,
    #[serde(rename = "type")]
    pub auth_type: AuthType,
    pub introduction: Option<String>,
    pub following_num: u32,
    pub reviews: Vec<ReviewResponse>,
}

impl From<UserInfo> for UserInfoResponse {
    fn from(info: UserInfo) -> Self {
        Self {
            user_id: info.user.id,
            email: info.user.email,
            nickname: info.user.nickname,
            categories: info.categories,
            profile_img: info.user.profile_img,
            auth_type: info.user.auth_type,
            introduction: info.user.introduction,
            following_num: info.following_num,
            reviews: info.reviews.iter().map(ReviewResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_envelope_serializes_null_data() {
        let value = serde_json::to_value(Envelope::empty("Tour reserved successfully!")).unwrap();
        assert_eq!(
            value,
            json!({"code": "200", "message": "Tour reserved successfully!", "data": null})
        );
    }

    #[test]
    fn test_search_request_accepts_partial_body() {
        let request: SearchTourRequest =
            serde_json::from_value(json!({"keyword": "sea", "startDate": "2024-06-01"})).unwrap();
        let criteria = TourSearchCriteria::from(request);
        assert_eq!(criteria.keyword.as_deref(), Some("sea"));
        assert_eq!(criteria.start_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(criteria.region.is_none());
    }
}
