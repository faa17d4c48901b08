//! Tour Queries

use crate::application::ports::{PageRequest, TourSearchCriteria};
use crate::domain::tour::TourId;

/// 获取 Tour 详情查询
#[derive(Debug, Clone)]
pub struct GetTourDetail {
    pub tour_id: TourId,
}

/// 分页列出 Tour 查询
#[derive(Debug, Clone)]
pub struct ListTours {
    pub page: PageRequest,
}

/// 搜索 Tour 查询
#[derive(Debug, Clone)]
pub struct SearchTours {
    pub criteria: TourSearchCriteria,
    pub page: PageRequest,
}
