//! Tour Context - Aggregate Root

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use super::{TourContent, TourError, TourId, TourPatch, TourStatus};
use crate::domain::user::UserId;

/// 待持久化的新 Tour（尚未分配 ID）
#[derive(Debug, Clone)]
pub struct NewTour {
    author_id: UserId,
    content: TourContent,
    created_at: DateTime<Utc>,
}

impl NewTour {
    pub fn new(author_id: UserId, mut content: TourContent) -> Result<Self, TourError> {
        content.validate()?;
        content.dedup_categories();
        Ok(Self {
            author_id,
            content,
            created_at: Utc::now(),
        })
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn content(&self) -> &TourContent {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Tour 聚合根
///
/// 不变量:
/// - 课程数量不超过 3
/// - 只有作者可以修改、终止 Tour 或登记链接
/// - 已终止的 Tour 不再接受预约与修改
/// - 预约人数达到 `max_member` 时状态为 `Reserved`
#[derive(Debug, Clone)]
pub struct Tour {
    id: TourId,
    author_id: UserId,
    content: TourContent,
    link: Option<String>,
    status: TourStatus,
    reserved_user_ids: BTreeSet<UserId>,
    wished_user_ids: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Tour {
    /// 由新注册的 Tour 和仓储分配的 ID 构建
    pub fn from_new(id: TourId, new_tour: NewTour) -> Self {
        Self {
            id,
            author_id: new_tour.author_id,
            content: new_tour.content,
            link: None,
            status: TourStatus::Active,
            reserved_user_ids: BTreeSet::new(),
            wished_user_ids: BTreeSet::new(),
            created_at: new_tour.created_at,
            updated_at: new_tour.created_at,
        }
    }

    /// 从持久化数据重建
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: TourId,
        author_id: UserId,
        content: TourContent,
        link: Option<String>,
        status: TourStatus,
        reserved_user_ids: BTreeSet<UserId>,
        wished_user_ids: BTreeSet<UserId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            content,
            link,
            status,
            reserved_user_ids,
            wished_user_ids,
            created_at,
            updated_at,
        }
    }

    /// 预约
    pub fn reserve(&mut self, user_id: UserId) -> Result<(), TourError> {
        if self.status == TourStatus::Terminated {
            return Err(TourError::Terminated);
        }
        if self.author_id == user_id {
            return Err(TourError::OwnTour);
        }
        if self.reserved_user_ids.contains(&user_id) {
            return Err(TourError::AlreadyReserved);
        }
        if self.is_full() {
            return Err(TourError::Full);
        }

        self.reserved_user_ids.insert(user_id);
        self.refresh_capacity_status();
        self.touch();
        Ok(())
    }

    /// 取消预约，返回是否确实移除了预约
    pub fn cancel_reservation(&mut self, user_id: UserId) -> bool {
        let removed = self.reserved_user_ids.remove(&user_id);
        if removed {
            self.refresh_capacity_status();
            self.touch();
        }
        removed
    }

    /// 切换心愿状态，返回切换后是否处于已心愿状态
    pub fn toggle_wish(&mut self, user_id: UserId) -> Result<bool, TourError> {
        if self.author_id == user_id {
            return Err(TourError::OwnTour);
        }

        let wished = if self.wished_user_ids.remove(&user_id) {
            false
        } else {
            self.wished_user_ids.insert(user_id);
            true
        };
        self.touch();
        Ok(wished)
    }

    /// 取消心愿
    pub fn cancel_wish(&mut self, user_id: UserId) -> Result<(), TourError> {
        if !self.wished_user_ids.remove(&user_id) {
            return Err(TourError::WishNotFound);
        }
        self.touch();
        Ok(())
    }

    /// 终止 Tour
    pub fn terminate(&mut self, user_id: UserId) -> Result<(), TourError> {
        self.ensure_author(user_id)?;
        if self.status == TourStatus::Terminated {
            return Err(TourError::Terminated);
        }
        self.status = TourStatus::Terminated;
        self.touch();
        Ok(())
    }

    /// 修改 Tour 内容
    pub fn update(&mut self, user_id: UserId, patch: TourPatch) -> Result<(), TourError> {
        self.ensure_author(user_id)?;
        if self.status == TourStatus::Terminated {
            return Err(TourError::Terminated);
        }

        let content = patch.apply_to(&self.content)?;
        let reserved = self.reserved_user_ids.len();
        if (content.members.max() as usize) < reserved {
            return Err(TourError::CapacityBelowReservations {
                max: content.members.max(),
                reserved,
            });
        }

        self.content = content;
        self.refresh_capacity_status();
        self.touch();
        Ok(())
    }

    /// 登记链接
    pub fn update_link(&mut self, user_id: UserId, link: &str) -> Result<(), TourError> {
        self.ensure_author(user_id)?;
        let link = link.trim();
        if link.is_empty() {
            return Err(TourError::EmptyField("link"));
        }
        self.link = Some(link.to_string());
        self.touch();
        Ok(())
    }

    fn ensure_author(&self, user_id: UserId) -> Result<(), TourError> {
        if self.author_id != user_id {
            return Err(TourError::NotAuthor);
        }
        Ok(())
    }

    fn is_full(&self) -> bool {
        self.reserved_user_ids.len() >= self.content.members.max() as usize
    }

    fn refresh_capacity_status(&mut self) {
        if self.status == TourStatus::Terminated {
            return;
        }
        self.status = if self.is_full() {
            TourStatus::Reserved
        } else {
            TourStatus::Active
        };
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn id(&self) -> TourId {
        self.id
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn content(&self) -> &TourContent {
        &self.content
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn status(&self) -> TourStatus {
        self.status
    }

    pub fn reserved_user_ids(&self) -> &BTreeSet<UserId> {
        &self.reserved_user_ids
    }

    pub fn wished_user_ids(&self) -> &BTreeSet<UserId> {
        &self.wished_user_ids
    }

    pub fn is_wished_by(&self, user_id: UserId) -> bool {
        self.wished_user_ids.contains(&user_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tour::{Course, Courses, MemberRange, Schedule};
    use chrono::NaiveDate;

    const AUTHOR: UserId = 1;
    const GUEST: UserId = 2;
    const OTHER: UserId = 3;

    fn content(max_member: u32) -> TourContent {
        TourContent {
            title: "Haeundae night walk".to_string(),
            content: "Beach, market and bridge view".to_string(),
            region: "busan".to_string(),
            categories: vec!["night".to_string()],
            schedule: Schedule::new(
                NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
            )
            .unwrap(),
            members: MemberRange::new(1, max_member).unwrap(),
            price: 15000,
            courses: Courses::new(vec![Course {
                title: "Haeundae beach".to_string(),
                content: String::new(),
                image_url: None,
            }])
            .unwrap(),
            image_urls: Vec::new(),
        }
    }

    fn tour(max_member: u32) -> Tour {
        Tour::from_new(1, NewTour::new(AUTHOR, content(max_member)).unwrap())
    }

    #[test]
    fn test_new_tour_requires_title() {
        let mut c = content(2);
        c.title = " ".to_string();
        assert_eq!(
            NewTour::new(AUTHOR, c).unwrap_err(),
            TourError::EmptyField("title")
        );
    }

    #[test]
    fn test_new_tour_dedups_categories() {
        let mut c = content(2);
        c.categories = vec!["temple".into(), "sea".into(), "temple".into()];
        let new_tour = NewTour::new(AUTHOR, c).unwrap();
        assert_eq!(
            new_tour.content().categories,
            vec!["temple".to_string(), "sea".to_string()]
        );
    }

    #[test]
    fn test_reserve_until_full_then_cancel() {
        let mut tour = tour(2);
        tour.reserve(GUEST).unwrap();
        assert_eq!(tour.status(), TourStatus::Active);

        tour.reserve(OTHER).unwrap();
        assert_eq!(tour.status(), TourStatus::Reserved);
        assert_eq!(tour.reserve(4), Err(TourError::Full));

        assert!(tour.cancel_reservation(GUEST));
        assert_eq!(tour.status(), TourStatus::Active);
        assert!(!tour.cancel_reservation(GUEST));
    }

    #[test]
    fn test_reserve_rules() {
        let mut tour = tour(5);
        assert_eq!(tour.reserve(AUTHOR), Err(TourError::OwnTour));
        tour.reserve(GUEST).unwrap();
        assert_eq!(tour.reserve(GUEST), Err(TourError::AlreadyReserved));

        tour.terminate(AUTHOR).unwrap();
        assert_eq!(tour.reserve(OTHER), Err(TourError::Terminated));
    }

    #[test]
    fn test_toggle_wish() {
        let mut tour = tour(5);
        assert_eq!(tour.toggle_wish(GUEST), Ok(true));
        assert!(tour.is_wished_by(GUEST));
        assert_eq!(tour.toggle_wish(GUEST), Ok(false));
        assert!(!tour.is_wished_by(GUEST));
        assert_eq!(tour.toggle_wish(AUTHOR), Err(TourError::OwnTour));
    }

    #[test]
    fn test_cancel_wish() {
        let mut tour = tour(5);
        assert_eq!(tour.cancel_wish(GUEST), Err(TourError::WishNotFound));
        tour.toggle_wish(GUEST).unwrap();
        assert!(tour.cancel_wish(GUEST).is_ok());
        assert!(tour.wished_user_ids().is_empty());
    }

    #[test]
    fn test_terminate_author_only() {
        let mut tour = tour(5);
        assert_eq!(tour.terminate(GUEST), Err(TourError::NotAuthor));
        tour.terminate(AUTHOR).unwrap();
        assert_eq!(tour.status(), TourStatus::Terminated);
        assert_eq!(tour.terminate(AUTHOR), Err(TourError::Terminated));
    }

    #[test]
    fn test_update_merges_patch() {
        let mut tour = tour(5);
        let patch = TourPatch {
            title: Some("Gamcheon village".to_string()),
            price: Some(20000),
            ..Default::default()
        };
        tour.update(AUTHOR, patch).unwrap();
        assert_eq!(tour.content().title, "Gamcheon village");
        assert_eq!(tour.content().price, 20000);
        assert_eq!(tour.content().region, "busan");
    }

    #[test]
    fn test_update_rejects_non_author_and_too_many_courses() {
        let mut tour = tour(5);
        assert_eq!(
            tour.update(GUEST, TourPatch::default()),
            Err(TourError::NotAuthor)
        );

        let course = Course {
            title: "stop".to_string(),
            content: String::new(),
            image_url: None,
        };
        let patch = TourPatch {
            courses: Some(vec![course.clone(), course.clone(), course.clone(), course]),
            ..Default::default()
        };
        assert_eq!(tour.update(AUTHOR, patch), Err(TourError::TooManyCourses(4)));
    }

    #[test]
    fn test_update_capacity_below_reservations() {
        let mut tour = tour(3);
        tour.reserve(GUEST).unwrap();
        tour.reserve(OTHER).unwrap();
        let patch = TourPatch {
            max_member: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            tour.update(AUTHOR, patch),
            Err(TourError::CapacityBelowReservations { .. })
        ));

        let patch = TourPatch {
            max_member: Some(2),
            ..Default::default()
        };
        tour.update(AUTHOR, patch).unwrap();
        assert_eq!(tour.status(), TourStatus::Reserved);
    }

    #[test]
    fn test_update_link() {
        let mut tour = tour(3);
        assert_eq!(
            tour.update_link(GUEST, "https://live.example/1"),
            Err(TourError::NotAuthor)
        );
        assert_eq!(
            tour.update_link(AUTHOR, "   "),
            Err(TourError::EmptyField("link"))
        );
        tour.update_link(AUTHOR, " https://live.example/1 ").unwrap();
        assert_eq!(tour.link(), Some("https://live.example/1"));
    }
}
