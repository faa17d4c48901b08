//! Tour Commands

use chrono::NaiveDate;

use crate::application::ports::UploadedImage;
use crate::domain::tour::{Course, TourId, TourPatch};
use crate::domain::user::UserId;

/// 注册 Tour 命令
#[derive(Debug, Clone)]
pub struct RegisterTour {
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
    pub images: Vec<UploadedImage>,
}

/// 修改 Tour 命令
///
/// `images` 非空时替换原有图片列表
#[derive(Debug, Clone)]
pub struct UpdateTour {
    pub tour_id: TourId,
    pub user_id: UserId,
    pub patch: TourPatch,
    pub images: Vec<UploadedImage>,
}

/// 预约 Tour 命令
#[derive(Debug, Clone)]
pub struct ReserveTour {
    pub tour_id: TourId,
    pub user_id: UserId,
}

/// 取消预约命令
#[derive(Debug, Clone)]
pub struct CancelReservation {
    pub tour_id: TourId,
    pub user_id: UserId,
}

/// 切换心愿命令
#[derive(Debug, Clone)]
pub struct ToggleWish {
    pub tour_id: TourId,
    pub user_id: UserId,
}

/// 取消心愿命令
#[derive(Debug, Clone)]
pub struct CancelWish {
    pub tour_id: TourId,
    pub user_id: UserId,
}

/// 终止 Tour 命令
#[derive(Debug, Clone)]
pub struct TerminateTour {
    pub tour_id: TourId,
    pub user_id: UserId,
}

/// 登记 Tour 链接命令
#[derive(Debug, Clone)]
pub struct UpdateTourLink {
    pub tour_id: TourId,
    pub user_id: UserId,
    pub link: String,
}
