//! Page/limit arithmetic for list endpoints.

use serde::Serialize;

/// Page size used when the client sends none or a non-positive value.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        Self { page, limit }
    }

    /// Build from raw query-string values. Empty or non-numeric values count
    /// as absent.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let number = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(number(page), number(limit))
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let total_pages = ((total_items + request.limit - 1) / request.limit).max(1);
        Self {
            page: request.page,
            limit: request.limit,
            total_items,
            total_pages,
        }
    }
}
