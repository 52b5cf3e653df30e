//! Pagination vocabulary
//!
//! Every paginated listing on the REST surface shares the same request
//! parameters (`page`, `limit`) and response metadata
//! (`{page, limit, total, pages}`).

use serde::{Deserialize, Serialize};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on a single page, to keep result sets sane.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination query parameters (`?page=1&limit=20`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Clamp to sane values: page >= 1, 1 <= limit <= MAX_PAGE_SIZE.
    pub fn normalize(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }

    /// SQL OFFSET for the normalized page. Saturates so an absurd page
    /// number yields an empty page rather than an overflow.
    pub fn offset(&self) -> i64 {
        let (page, limit) = self.normalize();
        (page - 1).saturating_mul(limit)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: None,
            limit: None,
        }
    }
}

/// Pagination metadata included in listing responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageMeta {
    /// Build metadata from a normalized query and the total row count.
    pub fn new(query: &PageQuery, total: i64) -> Self {
        let (page, limit) = query.normalize();
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}
