//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::Envelope;
use crate::application::ApplicationError;

/// API 错误
///
/// 每个变体对应一个 HTTP 状态码，响应体为 `data` 为 null 的统一信封
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = status.as_u16();

        match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(code, error = %msg, "Bad request");
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!(code, error = %msg, "Unauthorized");
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!(code, error = %msg, "Illegal access");
            }
            ApiError::NotFound(msg) => {
                tracing::warn!(code, error = %msg, "Resource not found");
            }
            ApiError::Conflict(msg) => {
                tracing::warn!(code, error = %msg, "Resource conflict");
            }
            ApiError::Internal(msg) => {
                tracing::error!(code, error = %msg, "Internal server error");
            }
        }

        let envelope: Envelope<()> = Envelope::new(code.to_string(), self.message(), None);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ApplicationError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            ApplicationError::IllegalAccess(msg) => ApiError::Forbidden(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::RepositoryError(msg) | ApplicationError::StorageError(msg) => {
                ApiError::Internal(msg)
            }
        }
    }
}
