//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Pagination query parameters.
///
/// Values are taken leniently: anything that is not a positive integer
/// falls back to the default. `limit` is capped at [`MAX_PAGE_SIZE`] and
/// `page` at [`MAX_PAGE_NUMBER`].
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    pub page: Option<String>,
    /// Items per page
    pub limit: Option<String>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PaginationParams {
    /// Resolve to a concrete page window using `default_limit` when absent.
    pub fn resolve(&self, default_limit: u64) -> PageRequest {
        let page = positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER);
        let limit = positive(self.limit.as_deref()).unwrap_or(default_limit);
        PageRequest::new(page, limit)
    }
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE_NUMBER),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based page index for SeaORM paginators
    pub fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

/// A page of items plus its metadata
#[derive(Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated result
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let pages = if request.limit > 0 {
            total.div_ceil(request.limit)
        } else {
            0
        };

        Self {
            items,
            meta: PaginationMeta {
                page: request.page,
                limit: request.limit,
                total,
                pages,
            },
        }
    }

    /// Transform the items while keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PaginationParams {
        PaginationParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let req = params(None, None).resolve(20);
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn test_garbage_and_zero_fall_back() {
        let req = params(Some("abc"), Some("0")).resolve(10);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn test_limit_is_capped() {
        let req = params(Some("3"), Some("5000")).resolve(20);
        assert_eq!(req, PageRequest { page: 3, limit: 100 });
    }

    #[test]
    fn test_huge_page_is_capped() {
        let req = params(Some("18446744073709551615"), Some("100")).resolve(20);
        assert_eq!(req.page, MAX_PAGE_NUMBER);
        assert!(req.index().checked_mul(req.limit).is_some_and(|offset| offset <= i64::MAX as u64));

        assert_eq!(PageRequest::new(u64::MAX, 10).page, MAX_PAGE_NUMBER);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page: Paginated<u8> = Paginated::new(vec![], PageRequest::new(1, 10), 21);
        assert_eq!(page.meta.pages, 3);

        let empty: Paginated<u8> = Paginated::new(vec![], PageRequest::new(1, 10), 0);
        assert_eq!(empty.meta.pages, 0);
    }
}
