//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod image_storage;
mod repositories;

pub use image_storage::{ImageStorageError, ImageStoragePort, UploadedImage};
pub use repositories::{
    tour_mutation, Page, PageRequest, RepositoryError, TourMutation, TourRepositoryPort,
    TourSearchCriteria, TourUpdateError, UpdatedTour, UserRepositoryPort,
};
