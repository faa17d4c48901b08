//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use super::extract::PagingDefaults;
use crate::application::{
    // Command handlers
    CancelReservationHandler, CancelWishHandler, RegisterTourHandler, ReserveTourHandler,
    TerminateTourHandler, ToggleWishHandler, UpdateTourHandler, UpdateTourLinkHandler,
    // Query handlers
    GetTourDetailHandler, GetUserInfoHandler, ListToursHandler, SearchToursHandler,
    // Ports
    ImageStoragePort, TourRepositoryPort, UserRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    /// 认证提取器按令牌查询用户
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub paging: PagingDefaults,

    // ========== Command Handlers ==========
    pub register_tour_handler: RegisterTourHandler,
    pub update_tour_handler: UpdateTourHandler,
    pub reserve_tour_handler: ReserveTourHandler,
    pub cancel_reservation_handler: CancelReservationHandler,
    pub toggle_wish_handler: ToggleWishHandler,
    pub cancel_wish_handler: CancelWishHandler,
    pub terminate_tour_handler: TerminateTourHandler,
    pub update_tour_link_handler: UpdateTourLinkHandler,

    // ========== Query Handlers ==========
    pub get_tour_detail_handler: GetTourDetailHandler,
    pub list_tours_handler: ListToursHandler,
    pub search_tours_handler: SearchToursHandler,
    pub get_user_info_handler: GetUserInfoHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        tour_repo: Arc<dyn TourRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
        paging: PagingDefaults,
    ) -> Self {
        Self {
            // Ports
            user_repo: user_repo.clone(),
            paging,

            // Command handlers
            register_tour_handler: RegisterTourHandler::new(
                tour_repo.clone(),
                image_storage.clone(),
            ),
            update_tour_handler: UpdateTourHandler::new(tour_repo.clone(), image_storage),
            reserve_tour_handler: ReserveTourHandler::new(tour_repo.clone()),
            cancel_reservation_handler: CancelReservationHandler::new(tour_repo.clone()),
            toggle_wish_handler: ToggleWishHandler::new(tour_repo.clone()),
            cancel_wish_handler: CancelWishHandler::new(tour_repo.clone()),
            terminate_tour_handler: TerminateTourHandler::new(tour_repo.clone()),
            update_tour_link_handler: UpdateTourLinkHandler::new(tour_repo.clone()),

            // Query handlers
            get_tour_detail_handler: GetTourDetailHandler::new(
                tour_repo.clone(),
                user_repo.clone(),
            ),
            list_tours_handler: ListToursHandler::new(tour_repo.clone()),
            search_tours_handler: SearchToursHandler::new(tour_repo),
            get_user_info_handler: GetUserInfoHandler::new(user_repo),
        }
    }
}
