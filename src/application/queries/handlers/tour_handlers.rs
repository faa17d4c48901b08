//! Tour Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{Page, TourRepositoryPort, UserRepositoryPort};
use crate::application::queries::{GetTourDetail, ListTours, SearchTours};
use crate::domain::tour::Tour;
use crate::domain::user::User;

// ============================================================================
// Response
// ============================================================================

/// Tour 详情（附带作者信息）
#[derive(Debug, Clone)]
pub struct TourDetail {
    pub tour: Tour,
    /// 作者账号被外部系统删除时为 None
    pub author: Option<User>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetTourDetail Handler
pub struct GetTourDetailHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl GetTourDetailHandler {
    pub fn new(
        tour_repo: Arc<dyn TourRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
    ) -> Self {
        Self {
            tour_repo,
            user_repo,
        }
    }

    pub async fn handle(&self, query: GetTourDetail) -> Result<TourDetail, ApplicationError> {
        let tour = self
            .tour_repo
            .find_by_id(query.tour_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Tour", query.tour_id))?;

        let author = self.user_repo.find_by_id(tour.author_id()).await?;
        if author.is_none() {
            tracing::warn!(
                tour_id = tour.id(),
                author_id = tour.author_id(),
                "Tour author not found"
            );
        }

        Ok(TourDetail { tour, author })
    }
}

/// ListTours Handler
pub struct ListToursHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl ListToursHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, query: ListTours) -> Result<Page<Tour>, ApplicationError> {
        Ok(self.tour_repo.find_page(query.page).await?)
    }
}

/// SearchTours Handler
pub struct SearchToursHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl SearchToursHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, query: SearchTours) -> Result<Vec<Tour>, ApplicationError> {
        let tours = self.tour_repo.search(&query.criteria, query.page).await?;

        tracing::debug!(
            keyword = ?query.criteria.keyword,
            region = ?query.criteria.region,
            page = query.page.page,
            found = tours.len(),
            "Tour search"
        );

        Ok(tours)
    }
}
