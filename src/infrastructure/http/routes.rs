//! HTTP Routes
//!
//! API Endpoints:
//! - /ping                          GET     健康检查
//! - /tour                          POST    注册 Tour（multipart）
//! - /tour                          GET     分页列出 Tour
//! - /tour/search                   POST    搜索 Tour
//! - /tour/:tour_id                 GET     Tour 详情
//! - /tour/:tour_id                 PUT     修改 Tour（multipart）
//! - /tour/reservation/:tour_id     POST    预约
//! - /tour/reservation/:tour_id     DELETE  取消预约
//! - /tour/wish/:tour_id            POST    切换心愿
//! - /tour/wish/:tour_id            DELETE  取消心愿
//! - /tour/end/:tour_id             DELETE  终止 Tour
//! - /tour/link/:tour_id            PUT     登记直播链接
//! - /user/me                       GET     当前用户资料
//! - /user/:user_id                 GET     用户资料

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/tour", tour_routes())
        .nest("/user", user_routes())
}

/// Tour 路由
fn tour_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_tours).post(handlers::register_tour))
        .route("/search", post(handlers::search_tours))
        .route(
            "/:tour_id",
            get(handlers::get_tour_detail).put(handlers::update_tour),
        )
        .route(
            "/reservation/:tour_id",
            post(handlers::reserve_tour).delete(handlers::cancel_reservation),
        )
        .route(
            "/wish/:tour_id",
            post(handlers::toggle_wish).delete(handlers::cancel_wish),
        )
        .route("/end/:tour_id", delete(handlers::terminate_tour))
        .route("/link/:tour_id", put(handlers::update_tour_link))
}

/// User 路由
fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(handlers::get_my_info))
        .route("/:user_id", get(handlers::get_user_info))
}
