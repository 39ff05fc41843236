//! Page/limit pagination math shared by every listing endpoint.

use serde::Serialize;

/// Default page size when the caller omits `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided page number to `>= 1`.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Number of pages needed to show `total` rows at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// A normalized `(page, limit)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            limit: clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results with the counters clients need to paginate.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total_pages(total, request.limit),
        }
    }
}
