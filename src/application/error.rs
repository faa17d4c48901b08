//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{ImageStorageError, RepositoryError, TourUpdateError};
use crate::domain::tour::TourError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: &'static str, id: i64 },

    /// 参数或业务规则不合法
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 无权访问
    #[error("Illegal access: {0}")]
    IllegalAccess(String),

    /// 状态冲突（如重复预约）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: i64) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建参数错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// 创建无权访问错误
    pub fn illegal_access(message: impl Into<String>) -> Self {
        Self::IllegalAccess(message.into())
    }
}

impl From<TourError> for ApplicationError {
    fn from(err: TourError) -> Self {
        match err {
            TourError::NotAuthor | TourError::OwnTour | TourError::WishNotFound => {
                Self::IllegalAccess(err.to_string())
            }
            TourError::AlreadyReserved => Self::Conflict(err.to_string()),
            TourError::TooManyCourses(_)
            | TourError::EmptyField(_)
            | TourError::InvalidSchedule
            | TourError::InvalidMemberRange { .. }
            | TourError::CapacityBelowReservations { .. }
            | TourError::Full
            | TourError::Terminated => Self::InvalidArgument(err.to_string()),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<TourUpdateError> for ApplicationError {
    fn from(err: TourUpdateError) -> Self {
        match err {
            TourUpdateError::NotFound(id) => Self::not_found("Tour", id),
            TourUpdateError::Rejected(e) => e.into(),
            TourUpdateError::Repository(e) => e.into(),
        }
    }
}

impl From<ImageStorageError> for ApplicationError {
    fn from(err: ImageStorageError) -> Self {
        match err {
            ImageStorageError::UnsupportedType(_) | ImageStorageError::TooLarge { .. } => {
                Self::InvalidArgument(err.to_string())
            }
            ImageStorageError::IoError(_) => Self::StorageError(err.to_string()),
        }
    }
}
