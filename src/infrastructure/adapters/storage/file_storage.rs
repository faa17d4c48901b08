//! File Storage - 文件系统图片存储实现
//!
//! 实现 ImageStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ImageStorageError, ImageStoragePort, UploadedImage};

/// 允许的图片扩展名
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// 文件系统图片存储
pub struct FileImageStorage {
    /// 存储根目录
    base_dir: PathBuf,
    /// 对外访问的 URL 前缀
    url_prefix: String,
    /// 单张图片大小上限（字节）
    max_size: usize,
}

impl FileImageStorage {
    /// 创建新的文件存储
    pub async fn new(
        base_dir: impl AsRef<Path>,
        url_prefix: impl Into<String>,
        max_size: usize,
    ) -> Result<Self, ImageStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            max_size,
        })
    }

    /// 确定文件扩展名：优先文件名，其次 Content-Type
    fn resolve_extension(image: &UploadedImage) -> Result<String, ImageStorageError> {
        if let Some(ext) = image.extension() {
            return if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
                Ok(ext)
            } else {
                Err(ImageStorageError::UnsupportedType(ext))
            };
        }

        match image.content_type.as_deref() {
            Some("image/jpeg") => Ok("jpg".to_string()),
            Some("image/png") => Ok("png".to_string()),
            Some("image/gif") => Ok("gif".to_string()),
            Some("image/webp") => Ok("webp".to_string()),
            Some(other) => Err(ImageStorageError::UnsupportedType(other.to_string())),
            None => Err(ImageStorageError::UnsupportedType("unknown".to_string())),
        }
    }

    /// 校验大小后确定扩展名
    fn checked_extension(&self, image: &UploadedImage) -> Result<String, ImageStorageError> {
        if image.bytes.len() > self.max_size {
            return Err(ImageStorageError::TooLarge {
                size: image.bytes.len(),
                limit: self.max_size,
            });
        }
        Self::resolve_extension(image)
    }

    /// 由 URL 还原存储路径，只接受本存储生成的文件名
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let file_name = url.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        let is_plain_name = !file_name.is_empty()
            && !file_name.starts_with('.')
            && !file_name.contains(&['/', '\\'][..]);
        is_plain_name.then(|| self.base_dir.join(file_name))
    }
}

#[async_trait]
impl ImageStoragePort for FileImageStorage {
    fn validate(&self, image: &UploadedImage) -> Result<(), ImageStorageError> {
        self.checked_extension(image).map(|_| ())
    }

    async fn store(&self, image: &UploadedImage) -> Result<String, ImageStorageError> {
        let ext = self.checked_extension(image)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.base_dir.join(&file_name);

        fs::write(&path, &image.bytes)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved image: file={}, size={} bytes",
            file_name,
            image.bytes.len()
        );

        Ok(format!("{}/{}", self.url_prefix, file_name))
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStorageError> {
        let path = self.path_for_url(url).ok_or_else(|| {
            ImageStorageError::IoError(format!("not a stored image url: {}", url))
        })?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted image: {}", url);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ImageStorageError::IoError(e.to_string())),
        }
    }
}
