//! Tour HTTP Handlers
//!
//! 每个接口：解析请求 → 校验 → 调用 Handler → 包装信封

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CancelReservation, CancelWish, GetTourDetail, ListTours, ReserveTour, SearchTours,
    TerminateTour, ToggleWish, UpdateTourLink,
};
use crate::domain::tour::{TourId, MAX_COURSES};
use crate::infrastructure::http::auth::AuthUser;
use crate::infrastructure::http::dto::{
    Envelope, SearchTourRequest, TourDetailResponse, TourLinkRequest, TourListResponse,
    TourResponse, TourSummaryResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath, PageQuery};
use crate::infrastructure::http::form::TourForm;
use crate::infrastructure::http::state::AppState;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// 注册 Tour
pub async fn register_tour(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    form: TourForm,
) -> ApiResult<TourResponse> {
    if form.course_count() > MAX_COURSES {
        return Err(ApiError::BadRequest(format!(
            "The number of courses must be less than {}",
            MAX_COURSES + 1
        )));
    }

    let command = form.into_register(user.id)?;
    let tour = state.register_tour_handler.handle(command).await?;

    Ok(Json(Envelope::ok(
        "Tour registered successfully!",
        TourResponse::from(&tour),
    )))
}

/// 获取 Tour 详情
pub async fn get_tour_detail(
    State(state): State<Arc<AppState>>,
    ApiPath(tour_id): ApiPath<TourId>,
) -> ApiResult<TourDetailResponse> {
    let detail = state
        .get_tour_detail_handler
        .handle(GetTourDetail { tour_id })
        .await?;

    Ok(Json(Envelope::ok(
        "Tour detail loaded successfully!",
        TourDetailResponse::from(&detail),
    )))
}

/// 预约 Tour
pub async fn reserve_tour(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
) -> ApiResult<()> {
    state
        .reserve_tour_handler
        .handle(ReserveTour {
            tour_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(Envelope::empty("Tour reserved successfully!")))
}

/// 切换心愿
pub async fn toggle_wish(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
) -> ApiResult<()> {
    let wished = state
        .toggle_wish_handler
        .handle(ToggleWish {
            tour_id,
            user_id: user.id,
        })
        .await?;

    let message = if wished {
        "Tour added to wish list!"
    } else {
        "Tour removed from wish list!"
    };
    Ok(Json(Envelope::empty(message)))
}

/// 取消预约
pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
) -> ApiResult<()> {
    state
        .cancel_reservation_handler
        .handle(CancelReservation {
            tour_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(Envelope::empty("Tour reservation cancelled successfully!")))
}

/// 取消心愿
pub async fn cancel_wish(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
) -> ApiResult<()> {
    state
        .cancel_wish_handler
        .handle(CancelWish {
            tour_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(Envelope::empty("Tour wish cancelled successfully!")))
}

/// 终止 Tour
pub async fn terminate_tour(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
) -> ApiResult<()> {
    state
        .terminate_tour_handler
        .handle(TerminateTour {
            tour_id,
            user_id: user.id,
        })
        .await?;

    Ok(Json(Envelope::empty("Tour terminated successfully!")))
}

/// 分页列出 Tour
pub async fn list_tours(
    State(state): State<Arc<AppState>>,
    query: PageQuery,
) -> ApiResult<TourListResponse> {
    let page = query.into_page_request(state.paging.list_size, state.paging.max_size)?;
    let tours = state.list_tours_handler.handle(ListTours { page }).await?;

    Ok(Json(Envelope::ok(
        "Tour list loaded successfully!",
        TourListResponse::from(tours),
    )))
}

/// 修改 Tour
pub async fn update_tour(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
    form: TourForm,
) -> ApiResult<TourResponse> {
    let command = form.into_update(tour_id, user.id);
    let tour = state.update_tour_handler.handle(command).await?;

    Ok(Json(Envelope::ok(
        "Tour updated successfully!",
        TourResponse::from(&tour),
    )))
}

/// 搜索 Tour
pub async fn search_tours(
    State(state): State<Arc<AppState>>,
    query: PageQuery,
    ApiJson(request): ApiJson<SearchTourRequest>,
) -> ApiResult<Vec<TourSummaryResponse>> {
    let page = query.into_page_request(state.paging.search_size, state.paging.max_size)?;
    let tours = state
        .search_tours_handler
        .handle(SearchTours {
            criteria: request.into(),
            page,
        })
        .await?;

    Ok(Json(Envelope::ok(
        "Tours found successfully.",
        tours.iter().map(TourSummaryResponse::from).collect(),
    )))
}

/// 登记 Tour 直播链接
pub async fn update_tour_link(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiPath(tour_id): ApiPath<TourId>,
    ApiJson(request): ApiJson<TourLinkRequest>,
) -> ApiResult<()> {
    state
        .update_tour_link_handler
        .handle(UpdateTourLink {
            tour_id,
            user_id: user.id,
            link: request.link,
        })
        .await?;

    Ok(Json(Envelope::empty("Tour link registered successfully.")))
}
