//! Request Extractors
//!
//! 包装 axum 自带提取器，使提取失败同样返回统一信封

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use super::error::ApiError;
use crate::application::PageRequest;

/// 路径参数
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON 请求体
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// 分页默认值
#[derive(Debug, Clone, Copy)]
pub struct PagingDefaults {
    pub list_size: u32,
    pub search_size: u32,
    pub max_size: u32,
}

impl Default for PagingDefaults {
    fn default() -> Self {
        Self {
            list_size: 6,
            search_size: 18,
            max_size: 100,
        }
    }
}

/// 分页查询参数 `?page=&size=`
///
/// 以字符串接收，解析失败时返回 400 而不是 axum 的纯文本拒绝
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    size: Option<String>,
}

impl PageQuery {
    /// 转换为分页请求，`size` 缺省时使用接口默认值
    pub fn into_page_request(
        self,
        default_size: u32,
        max_size: u32,
    ) -> Result<PageRequest, ApiError> {
        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid page: {}", raw)))?,
        };

        let size = match self.size.as_deref().map(str::trim) {
            None | Some("") => default_size,
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid size: {}", raw)))?,
        };

        if size == 0 || size > max_size {
            return Err(ApiError::BadRequest(format!(
                "Page size must be between 1 and {}",
                max_size
            )));
        }

        Ok(PageRequest::new(page, size))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(query)
    }
}
