//! Pagination shapes shared across list endpoints (spec.md §4.3, §6.1).

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be >= 1"))]
    pub page: u32,

    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 200, message = "per_page must be between 1 and 200"))]
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        ((self.page.saturating_sub(1)) as i64) * (self.per_page as i64)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn meta(&self, total_count: i64) -> PaginationMeta {
        let total_pages = if total_count == 0 {
            0
        } else {
            ((total_count as f64) / (self.per_page as f64)).ceil() as i64
        };
        PaginationMeta {
            total_count,
            page: self.page,
            per_page: self.per_page,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total_count: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}
