//! Tour Context - Value Objects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TourError;

/// Tour 唯一标识（由仓储分配，从 1 开始）
pub type TourId = i64;

/// 单个 Tour 允许的最大课程数
pub const MAX_COURSES: usize = 3;

/// Tour 生命周期状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    /// 可预约
    #[default]
    Active,
    /// 已满员
    Reserved,
    /// 已终止
    Terminated,
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Active => "active",
            TourStatus::Reserved => "reserved",
            TourStatus::Terminated => "terminated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TourStatus::Active),
            "reserved" => Some(TourStatus::Reserved),
            "terminated" => Some(TourStatus::Terminated),
            _ => None,
        }
    }
}

/// 课程（Tour 下的子行程）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 有序课程列表
///
/// 不变量:
/// - 课程数量不超过 `MAX_COURSES`
/// - 每个课程标题非空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Courses(Vec<Course>);

impl Courses {
    pub fn new(courses: Vec<Course>) -> Result<Self, TourError> {
        if courses.len() > MAX_COURSES {
            return Err(TourError::TooManyCourses(courses.len()));
        }
        if courses.iter().any(|c| c.title.trim().is_empty()) {
            return Err(TourError::EmptyField("course title"));
        }
        Ok(Self(courses))
    }

    pub fn as_slice(&self) -> &[Course] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 行程日期范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    start: NaiveDate,
    end: NaiveDate,
}

impl Schedule {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TourError> {
        if end < start {
            return Err(TourError::InvalidSchedule);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// 参与人数范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRange {
    min: u32,
    max: u32,
}

impl MemberRange {
    pub fn new(min: u32, max: u32) -> Result<Self, TourError> {
        if min == 0 || min > max {
            return Err(TourError::InvalidMemberRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Tour 的可编辑内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourContent {
    pub title: String,
    pub content: String,
    pub region: String,
    pub categories: Vec<String>,
    pub schedule: Schedule,
    pub members: MemberRange,
    pub price: u32,
    pub courses: Courses,
    pub image_urls: Vec<String>,
}

impl TourContent {
    /// 去除重复分类，保留首次出现的顺序
    pub fn dedup_categories(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.categories.retain(|c| seen.insert(c.clone()));
    }

    /// 校验文本字段
    ///
    /// 日程、人数与课程在各自的构造函数中已校验
    pub fn validate(&self) -> Result<(), TourError> {
        if self.title.trim().is_empty() {
            return Err(TourError::EmptyField("title"));
        }
        if self.content.trim().is_empty() {
            return Err(TourError::EmptyField("content"));
        }
        if self.region.trim().is_empty() {
            return Err(TourError::EmptyField("region"));
        }
        Ok(())
    }
}

/// Tour 部分更新
///
/// `None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct TourPatch {
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
    pub image_urls: Option<Vec<String>>,
}

impl TourPatch {
    /// 将补丁合并到现有内容，返回校验后的新内容
    pub fn apply_to(self, current: &TourContent) -> Result<TourContent, TourError> {
        let schedule = Schedule::new(
            self.start_date.unwrap_or(current.schedule.start()),
            self.end_date.unwrap_or(current.schedule.end()),
        )?;
        let members = MemberRange::new(
            self.min_member.unwrap_or(current.members.min()),
            self.max_member.unwrap_or(current.members.max()),
        )?;
        let courses = match self.courses {
            Some(courses) => Courses::new(courses)?,
            None => current.courses.clone(),
        };

        let mut merged = TourContent {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            content: self.content.unwrap_or_else(|| current.content.clone()),
            region: self.region.unwrap_or_else(|| current.region.clone()),
            categories: self
                .categories
                .unwrap_or_else(|| current.categories.clone()),
            schedule,
            members,
            price: self.price.unwrap_or(current.price),
            courses,
            image_urls: self
                .image_urls
                .unwrap_or_else(|| current.image_urls.clone()),
        };
        merged.validate()?;
        merged.dedup_categories();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str) -> Course {
        Course {
            title: title.to_string(),
            content: String::new(),
            image_url: None,
        }
    }

    #[test]
    fn test_courses_limit() {
        assert!(Courses::new(vec![course("a"), course("b"), course("c")]).is_ok());
        assert_eq!(
            Courses::new(vec![course("a"), course("b"), course("c"), course("d")]),
            Err(TourError::TooManyCourses(4))
        );
    }

    #[test]
    fn test_course_title_required() {
        assert_eq!(
            Courses::new(vec![course("  ")]),
            Err(TourError::EmptyField("course title"))
        );
    }

    #[test]
    fn test_schedule_order() {
        let d1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert!(Schedule::new(d1, d1).is_ok());
        assert!(Schedule::new(d1, d2).is_ok());
        assert_eq!(Schedule::new(d2, d1), Err(TourError::InvalidSchedule));
    }

    #[test]
    fn test_member_range() {
        assert!(MemberRange::new(1, 1).is_ok());
        assert!(MemberRange::new(0, 4).is_err());
        assert!(MemberRange::new(5, 4).is_err());
    }

    #[test]
    fn test_patch_dedups_categories_in_order() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let current = TourContent {
            title: "Jagalchi market".to_string(),
            content: "Fish market breakfast".to_string(),
            region: "busan".to_string(),
            categories: Vec::new(),
            schedule: Schedule::new(day, day).unwrap(),
            members: MemberRange::new(1, 4).unwrap(),
            price: 0,
            courses: Courses::default(),
            image_urls: Vec::new(),
        };
        let patch = TourPatch {
            categories: Some(vec!["temple".into(), "sea".into(), "temple".into()]),
            ..Default::default()
        };
        let merged = patch.apply_to(&current).unwrap();
        assert_eq!(merged.categories, vec!["temple".to_string(), "sea".to_string()]);
    }

    #[test]
    fn test_status_roundtrip_names() {
        for status in [TourStatus::Active, TourStatus::Reserved, TourStatus::Terminated] {
            assert_eq!(TourStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(TourStatus::from_str("deleted"), None);
        assert_eq!(TourStatus::default(), TourStatus::Active);
    }
}
