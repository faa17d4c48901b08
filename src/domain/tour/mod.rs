//! Tour Context - 旅游行程限界上下文
//!
//! 职责:
//! - Tour 聚合管理（注册、修改、终止）
//! - 预约与心愿（Wish）关系
//! - 课程（Course）数量与日程约束

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{NewTour, Tour};
pub use errors::TourError;
pub use value_objects::{
    Course, Courses, MemberRange, Schedule, TourContent, TourId, TourPatch, TourStatus,
    MAX_COURSES,
};
