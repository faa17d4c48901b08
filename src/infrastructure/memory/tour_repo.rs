//! In-Memory Tour Repository

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::application::ports::{
    Page, PageRequest, RepositoryError, TourMutation, TourRepositoryPort, TourSearchCriteria,
    TourUpdateError, UpdatedTour,
};
use crate::domain::tour::{NewTour, Tour, TourId, TourStatus};

/// 内存 Tour 仓储
pub struct InMemoryTourRepository {
    tours: DashMap<TourId, Tour>,
    next_id: AtomicI64,
}

impl InMemoryTourRepository {
    pub fn new() -> Self {
        Self {
            tours: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// 按创建时间倒序的快照
    fn sorted_newest_first(&self) -> Vec<Tour> {
        let mut tours: Vec<Tour> = self.tours.iter().map(|e| e.value().clone()).collect();
        tours.sort_by_key(|t| Reverse((t.created_at(), t.id())));
        tours
    }
}

impl Default for InMemoryTourRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn slice_page(tours: Vec<Tour>, page: PageRequest) -> Vec<Tour> {
    tours
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect()
}

#[async_trait]
impl TourRepositoryPort for InMemoryTourRepository {
    async fn insert(&self, tour: &NewTour) -> Result<Tour, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tour = Tour::from_new(id, tour.clone());
        self.tours.insert(id, tour.clone());
        Ok(tour)
    }

    async fn update_with(
        &self,
        id: TourId,
        mutation: TourMutation,
    ) -> Result<UpdatedTour, TourUpdateError> {
        // 持有分片写锁直到修改完成
        let mut entry = self
            .tours
            .get_mut(&id)
            .ok_or(TourUpdateError::NotFound(id))?;

        let mut tour = entry.clone();
        let changed = mutation(&mut tour)?;
        if changed {
            *entry = tour.clone();
        }
        Ok(UpdatedTour { tour, changed })
    }

    async fn find_by_id(&self, id: TourId) -> Result<Option<Tour>, RepositoryError> {
        Ok(self.tours.get(&id).map(|t| t.clone()))
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Tour>, RepositoryError> {
        let tours = self.sorted_newest_first();
        let total_elements = tours.len() as u64;
        Ok(Page {
            items: slice_page(tours, page),
            request: page,
            total_elements,
        })
    }

    async fn search(
        &self,
        criteria: &TourSearchCriteria,
        page: PageRequest,
    ) -> Result<Vec<Tour>, RepositoryError> {
        let matched = self
            .sorted_newest_first()
            .into_iter()
            .filter(|t| t.status() != TourStatus::Terminated && criteria.matches(t))
            .collect();
        Ok(slice_page(matched, page))
    }
}
