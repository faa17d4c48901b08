//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、ImageStorage）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    CancelReservation,
    CancelWish,
    RegisterTour,
    ReserveTour,
    TerminateTour,
    ToggleWish,
    UpdateTour,
    UpdateTourLink,
    // Handlers
    handlers::{
        CancelReservationHandler, CancelWishHandler, RegisterTourHandler, ReserveTourHandler,
        TerminateTourHandler, ToggleWishHandler, UpdateTourHandler, UpdateTourLinkHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Image storage
    ImageStorageError,
    ImageStoragePort,
    UploadedImage,
    // Repositories
    Page,
    PageRequest,
    RepositoryError,
    tour_mutation,
    TourMutation,
    TourRepositoryPort,
    TourSearchCriteria,
    TourUpdateError,
    UpdatedTour,
    UserRepositoryPort,
};

pub use queries::{
    GetTourDetail,
    GetUserInfo,
    ListTours,
    SearchTours,
    // Handlers
    handlers::{
        GetTourDetailHandler, GetUserInfoHandler, ListToursHandler, SearchToursHandler,
        TourDetail, UserInfo,
    },
};
