//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite、内存）

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::tour::{NewTour, Tour, TourError, TourId};
use crate::domain::user::{Review, User, UserId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Paging
// ============================================================================

/// 分页请求（page 从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// 跳过的记录数
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// 分页结果
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.request.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.request.size))
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.request.page) + 1 >= self.total_pages()
    }
}

// ============================================================================
// Tour Repository
// ============================================================================

/// Tour 搜索条件
///
/// 所有条件均为可选，多个条件之间为 AND 关系
#[derive(Debug, Clone, Default)]
pub struct TourSearchCriteria {
    /// 标题或正文包含的关键字（不区分大小写）
    pub keyword: Option<String>,
    /// 地区（精确匹配）
    pub region: Option<String>,
    /// 分类（Tour 需包含该分类）
    pub category: Option<String>,
    /// 开始日期下限
    pub start_date: Option<NaiveDate>,
    /// 结束日期上限
    pub end_date: Option<NaiveDate>,
}

impl TourSearchCriteria {
    /// 判断 Tour 是否满足条件（不含终止状态过滤）
    pub fn matches(&self, tour: &Tour) -> bool {
        let content = tour.content();

        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            let keyword = keyword.to_lowercase();
            if !content.title.to_lowercase().contains(&keyword)
                && !content.content.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if &content.region != region {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !content.categories.iter().any(|c| c == category) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if content.schedule.start() < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if content.schedule.end() > end {
                return false;
            }
        }
        true
    }
}

/// 在仓储锁内对 Tour 执行的修改
///
/// 返回 `Ok(false)` 表示没有变化，仓储不写回
pub type TourMutation = Box<dyn FnOnce(&mut Tour) -> Result<bool, TourError> + Send>;

/// 将闭包包装为 `TourMutation`
pub fn tour_mutation<F>(f: F) -> TourMutation
where
    F: FnOnce(&mut Tour) -> Result<bool, TourError> + Send + 'static,
{
    Box::new(f)
}

/// `update_with` 的结果
#[derive(Debug, Clone)]
pub struct UpdatedTour {
    pub tour: Tour,
    pub changed: bool,
}

/// `update_with` 错误
#[derive(Debug, Error)]
pub enum TourUpdateError {
    #[error("Tour not found: {0}")]
    NotFound(TourId),

    #[error(transparent)]
    Rejected(#[from] TourError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Tour Repository Port
#[async_trait]
pub trait TourRepositoryPort: Send + Sync {
    /// 插入新 Tour，返回分配了 ID 的聚合
    async fn insert(&self, tour: &NewTour) -> Result<Tour, RepositoryError>;

    /// 读取、修改并写回 Tour
    ///
    /// 同一 Tour 的并发调用串行执行，`mutation` 总是看到最新状态；
    /// `mutation` 返回错误时不写入任何内容
    async fn update_with(
        &self,
        id: TourId,
        mutation: TourMutation,
    ) -> Result<UpdatedTour, TourUpdateError>;

    /// 根据 ID 查找 Tour
    async fn find_by_id(&self, id: TourId) -> Result<Option<Tour>, RepositoryError>;

    /// 分页获取所有 Tour（按创建时间倒序）
    async fn find_page(&self, page: PageRequest) -> Result<Page<Tour>, RepositoryError>;

    /// 搜索未终止的 Tour（按创建时间倒序）
    async fn search(
        &self,
        criteria: &TourSearchCriteria,
        page: PageRequest,
    ) -> Result<Vec<Tour>, RepositoryError>;
}

// ============================================================================
// User Repository
// ============================================================================

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// 根据访问令牌查找用户
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError>;

    /// 用户感兴趣的分类
    async fn find_categories(&self, id: UserId) -> Result<Vec<String>, RepositoryError>;

    /// 用户关注的人数
    async fn count_following(&self, id: UserId) -> Result<u32, RepositoryError>;

    /// 用户撰写的评价（按时间倒序）
    async fn find_reviews(&self, id: UserId) -> Result<Vec<Review>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, size: u32, total: u64) -> Page<()> {
        Page {
            items: Vec::new(),
            request: PageRequest::new(page, size),
            total_elements: total,
        }
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest::new(0, 6).offset(), 0);
        assert_eq!(PageRequest::new(3, 6).offset(), 18);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(page(0, 6, 0).total_pages(), 0);
        assert_eq!(page(0, 6, 6).total_pages(), 1);
        assert_eq!(page(0, 6, 7).total_pages(), 2);
    }

    #[test]
    fn test_is_last() {
        assert!(page(0, 6, 0).is_last());
        assert!(!page(0, 6, 7).is_last());
        assert!(page(1, 6, 7).is_last());
    }
}
