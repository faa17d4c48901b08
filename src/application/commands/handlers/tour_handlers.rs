//! Tour Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    CancelReservation, CancelWish, RegisterTour, ReserveTour, TerminateTour, ToggleWish,
    UpdateTour, UpdateTourLink,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    tour_mutation, ImageStoragePort, TourRepositoryPort, UploadedImage,
};
use crate::domain::tour::{
    Courses, MemberRange, NewTour, Schedule, Tour, TourContent, TourId,
};

/// 加载 Tour，不存在时返回 NotFound
async fn load_tour(
    tour_repo: &dyn TourRepositoryPort,
    tour_id: TourId,
) -> Result<Tour, ApplicationError> {
    tour_repo
        .find_by_id(tour_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Tour", tour_id))
}

/// 校验全部图片后依次保存，返回 URL 列表
///
/// 保存中途失败时删除已写入的图片
async fn store_images(
    image_storage: &dyn ImageStoragePort,
    images: &[UploadedImage],
) -> Result<Vec<String>, ApplicationError> {
    for image in images {
        image_storage.validate(image)?;
    }

    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        match image_storage.store(image).await {
            Ok(url) => urls.push(url),
            Err(e) => {
                discard_images(image_storage, &urls).await;
                return Err(e.into());
            }
        }
    }
    Ok(urls)
}

/// 删除没有被任何 Tour 引用的图片，失败只记录日志
async fn discard_images(image_storage: &dyn ImageStoragePort, urls: &[String]) {
    for url in urls {
        if let Err(e) = image_storage.delete(url).await {
            tracing::warn!(url = %url, error = %e, "Failed to delete orphaned image");
        }
    }
}

// ============================================================================
// RegisterTour
// ============================================================================

/// RegisterTour Handler
pub struct RegisterTourHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
}

impl RegisterTourHandler {
    pub fn new(
        tour_repo: Arc<dyn TourRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
    ) -> Self {
        Self {
            tour_repo,
            image_storage,
        }
    }

    pub async fn handle(&self, command: RegisterTour) -> Result<Tour, ApplicationError> {
        let courses = Courses::new(command.courses)?;
        let schedule = Schedule::new(command.start_date, command.end_date)?;
        let members = MemberRange::new(command.min_member, command.max_member)?;

        let content = TourContent {
            title: command.title,
            content: command.content,
            region: command.region,
            categories: command.categories,
            schedule,
            members,
            price: command.price,
            courses,
            image_urls: Vec::new(),
        };
        content.validate()?;

        let image_urls = store_images(self.image_storage.as_ref(), &command.images).await?;
        let content = TourContent {
            image_urls: image_urls.clone(),
            ..content
        };

        let inserted = match NewTour::new(command.author_id, content) {
            Ok(new_tour) => self
                .tour_repo
                .insert(&new_tour)
                .await
                .map_err(ApplicationError::from),
            Err(e) => Err(ApplicationError::from(e)),
        };
        let tour = match inserted {
            Ok(tour) => tour,
            Err(e) => {
                discard_images(self.image_storage.as_ref(), &image_urls).await;
                return Err(e);
            }
        };

        tracing::info!(
            tour_id = tour.id(),
            author_id = tour.author_id(),
            courses = tour.content().courses.len(),
            "Tour registered"
        );

        Ok(tour)
    }
}

// ============================================================================
// UpdateTour
// ============================================================================

/// UpdateTour Handler
pub struct UpdateTourHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
    image_storage: Arc<dyn ImageStoragePort>,
}

impl UpdateTourHandler {
    pub fn new(
        tour_repo: Arc<dyn TourRepositoryPort>,
        image_storage: Arc<dyn ImageStoragePort>,
    ) -> Self {
        Self {
            tour_repo,
            image_storage,
        }
    }

    pub async fn handle(&self, command: UpdateTour) -> Result<Tour, ApplicationError> {
        let user_id = command.user_id;

        // 先在副本上校验权限和内容，再写入图片
        let mut preview = load_tour(self.tour_repo.as_ref(), command.tour_id).await?;
        preview.update(user_id, command.patch.clone())?;

        let mut patch = command.patch;
        let image_urls = store_images(self.image_storage.as_ref(), &command.images).await?;
        if !image_urls.is_empty() {
            patch.image_urls = Some(image_urls.clone());
        }

        let updated = match self
            .tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| tour.update(user_id, patch).map(|_| true)),
            )
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                discard_images(self.image_storage.as_ref(), &image_urls).await;
                return Err(e.into());
            }
        };

        tracing::info!(tour_id = updated.tour.id(), user_id = user_id, "Tour updated");

        Ok(updated.tour)
    }
}

// ============================================================================
// ReserveTour / CancelReservation
// ============================================================================

/// ReserveTour Handler
pub struct ReserveTourHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl ReserveTourHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, command: ReserveTour) -> Result<(), ApplicationError> {
        let user_id = command.user_id;
        let updated = self
            .tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| tour.reserve(user_id).map(|_| true)),
            )
            .await?;

        tracing::info!(
            tour_id = updated.tour.id(),
            user_id = user_id,
            status = updated.tour.status().as_str(),
            "Tour reserved"
        );

        Ok(())
    }
}

/// CancelReservation Handler
pub struct CancelReservationHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl CancelReservationHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, command: CancelReservation) -> Result<(), ApplicationError> {
        let user_id = command.user_id;
        let updated = self
            .tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| Ok(tour.cancel_reservation(user_id))),
            )
            .await?;

        if !updated.changed {
            tracing::debug!(
                tour_id = command.tour_id,
                user_id = user_id,
                "No reservation to cancel"
            );
            return Ok(());
        }

        tracing::info!(
            tour_id = command.tour_id,
            user_id = user_id,
            "Tour reservation cancelled"
        );

        Ok(())
    }
}

// ============================================================================
// ToggleWish / CancelWish
// ============================================================================

/// ToggleWish Handler
pub struct ToggleWishHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl ToggleWishHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    /// 返回切换后是否处于已心愿状态
    pub async fn handle(&self, command: ToggleWish) -> Result<bool, ApplicationError> {
        let user_id = command.user_id;
        let updated = self
            .tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| tour.toggle_wish(user_id).map(|_| true)),
            )
            .await?;
        let wished = updated.tour.is_wished_by(user_id);

        tracing::info!(
            tour_id = command.tour_id,
            user_id = user_id,
            wished = wished,
            "Tour wish toggled"
        );

        Ok(wished)
    }
}

/// CancelWish Handler
pub struct CancelWishHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl CancelWishHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, command: CancelWish) -> Result<(), ApplicationError> {
        let user_id = command.user_id;
        self.tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| tour.cancel_wish(user_id).map(|_| true)),
            )
            .await?;

        tracing::info!(
            tour_id = command.tour_id,
            user_id = user_id,
            "Tour wish cancelled"
        );

        Ok(())
    }
}

// ============================================================================
// TerminateTour
// ============================================================================

/// TerminateTour Handler
pub struct TerminateTourHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl TerminateTourHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, command: TerminateTour) -> Result<(), ApplicationError> {
        let user_id = command.user_id;
        self.tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| tour.terminate(user_id).map(|_| true)),
            )
            .await?;

        tracing::info!(tour_id = command.tour_id, user_id = user_id, "Tour terminated");

        Ok(())
    }
}

// ============================================================================
// UpdateTourLink
// ============================================================================

/// UpdateTourLink Handler
pub struct UpdateTourLinkHandler {
    tour_repo: Arc<dyn TourRepositoryPort>,
}

impl UpdateTourLinkHandler {
    pub fn new(tour_repo: Arc<dyn TourRepositoryPort>) -> Self {
        Self { tour_repo }
    }

    pub async fn handle(&self, command: UpdateTourLink) -> Result<(), ApplicationError> {
        let user_id = command.user_id;
        let link = command.link;
        self.tour_repo
            .update_with(
                command.tour_id,
                tour_mutation(move |tour| tour.update_link(user_id, &link).map(|_| true)),
            )
            .await?;

        tracing::info!(tour_id = command.tour_id, user_id = user_id, "Tour link updated");

        Ok(())
    }
}
