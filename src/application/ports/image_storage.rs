//! Image Storage Port - 出站端口
//!
//! 定义上传图片的存储接口

use async_trait::async_trait;
use thiserror::Error;

/// 图片存储错误
#[derive(Debug, Error)]
pub enum ImageStorageError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image too large: {size} bytes, limit {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("IO error: {0}")]
    IoError(String),
}

/// 从 multipart 表单读取的图片
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// 文件扩展名（小写）
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Image Storage Port
#[async_trait]
pub trait ImageStoragePort: Send + Sync {
    /// 检查图片类型与大小，不写入
    fn validate(&self, image: &UploadedImage) -> Result<(), ImageStorageError>;

    /// 保存图片，返回可公开访问的 URL
    async fn store(&self, image: &UploadedImage) -> Result<String, ImageStorageError>;

    /// 删除 `store` 返回的 URL 对应的图片，不存在时视为成功
    async fn delete(&self, url: &str) -> Result<(), ImageStorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercased() {
        let image = UploadedImage {
            file_name: Some("Beach.JPG".to_string()),
            content_type: None,
            bytes: Vec::new(),
        };
        assert_eq!(image.extension().as_deref(), Some("jpg"));

        let unnamed = UploadedImage {
            file_name: None,
            content_type: None,
            bytes: Vec::new(),
        };
        assert_eq!(unnamed.extension(), None);
    }
}
