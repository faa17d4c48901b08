//! Tour Multipart 表单
//!
//! 注册与修改共用同一表单结构：注册时文本字段必填，修改时全部可选

use axum::{
    async_trait,
    extract::{multipart::Field, FromRequest, Multipart, Request},
};
use chrono::NaiveDate;
use std::str::FromStr;

use super::error::ApiError;
use crate::application::{RegisterTour, UpdateTour, UploadedImage};
use crate::domain::tour::{Course, TourId, TourPatch};
use crate::domain::user::UserId;

/// 解析后的 Tour 表单
#[derive(Debug, Default)]
pub struct TourForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub region: Option<String>,
    pub categories: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_member: Option<u32>,
    pub max_member: Option<u32>,
    pub price: Option<u32>,
    pub courses: Option<Vec<Course>>,
    pub images: Vec<UploadedImage>,
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))
}

fn parse_field<T: FromStr>(value: &str, name: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, value)))
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(format!("Missing field: {}", name)))
}

impl TourForm {
    /// 逐个读取 multipart 字段，未知字段忽略
    pub async fn parse(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = TourForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
        })? {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "title" => form.title = Some(read_text(field, "title").await?),
                "content" => form.content = Some(read_text(field, "content").await?),
                "region" => form.region = Some(read_text(field, "region").await?),
                "categories" => {
                    let category = read_text(field, "categories").await?;
                    form.categories.get_or_insert_with(Vec::new).push(category);
                }
                "startDate" => {
                    let raw = read_text(field, "startDate").await?;
                    form.start_date = Some(parse_field(&raw, "startDate")?);
                }
                "endDate" => {
                    let raw = read_text(field, "endDate").await?;
                    form.end_date = Some(parse_field(&raw, "endDate")?);
                }
                "minMember" => {
                    let raw = read_text(field, "minMember").await?;
                    form.min_member = Some(parse_field(&raw, "minMember")?);
                }
                "maxMember" => {
                    let raw = read_text(field, "maxMember").await?;
                    form.max_member = Some(parse_field(&raw, "maxMember")?);
                }
                "price" => {
                    let raw = read_text(field, "price").await?;
                    form.price = Some(parse_field(&raw, "price")?);
                }
                "courses" => {
                    let raw = read_text(field, "courses").await?;
                    let course: Course = serde_json::from_str(&raw)
                        .map_err(|e| ApiError::BadRequest(format!("Invalid course: {}", e)))?;
                    form.courses.get_or_insert_with(Vec::new).push(course);
                }
                "images" => {
                    let file_name = field
                        .file_name()
                        .map(str::to_string)
                        .filter(|name| !name.is_empty());
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read image: {}", e))
                    })?;

                    // 浏览器未选择文件时会提交空的文件字段
                    if file_name.is_none() && bytes.is_empty() {
                        continue;
                    }

                    form.images.push(UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown multipart field");
                }
            }
        }

        Ok(form)
    }

    /// 表单中的路线数量
    pub fn course_count(&self) -> usize {
        self.courses.as_ref().map_or(0, Vec::len)
    }

    /// 转换为注册命令
    pub fn into_register(self, author_id: UserId) -> Result<RegisterTour, ApiError> {
        Ok(RegisterTour {
            author_id,
            title: required(self.title, "title")?,
            content: required(self.content, "content")?,
            region: required(self.region, "region")?,
            categories: self.categories.unwrap_or_default(),
            start_date: required(self.start_date, "startDate")?,
            end_date: required(self.end_date, "endDate")?,
            min_member: required(self.min_member, "minMember")?,
            max_member: required(self.max_member, "maxMember")?,
            price: required(self.price, "price")?,
            courses: self.courses.unwrap_or_default(),
            images: self.images,
        })
    }

    /// 转换为修改命令
    pub fn into_update(self, tour_id: TourId, user_id: UserId) -> UpdateTour {
        UpdateTour {
            tour_id,
            user_id,
            patch: TourPatch {
                title: self.title,
                content: self.content,
                region: self.region,
                categories: self.categories,
                start_date: self.start_date,
                end_date: self.end_date,
                min_member: self.min_member,
                max_member: self.max_member,
                price: self.price,
                courses: self.courses,
                image_urls: None,
            },
            images: self.images,
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for TourForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Self::parse(multipart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_register_requires_text_fields() {
        let form = TourForm {
            title: Some("Jeju olle".to_string()),
            ..Default::default()
        };
        match form.into_register(1) {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Missing field: content"),
            other => panic!("unexpected result: {:?}", other.map(|c| c.title)),
        }
    }

    #[test]
    fn test_into_update_keeps_absent_fields_empty() {
        let form = TourForm {
            price: Some(1000),
            ..Default::default()
        };
        let command = form.into_update(3, 1);
        assert_eq!(command.patch.price, Some(1000));
        assert!(command.patch.title.is_none());
        assert!(command.patch.courses.is_none());
        assert!(command.images.is_empty());
    }

    #[test]
    fn test_parse_field_reports_name() {
        assert_eq!(parse_field::<u32>(" 12 ", "price").unwrap(), 12);
        match parse_field::<NaiveDate>("June", "startDate") {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Invalid startDate: June"),
            _ => panic!("expected bad request"),
        }
    }
}
