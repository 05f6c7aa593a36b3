//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters (1-based pages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(example = 10)]
    pub page_size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Page number, at least 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Page size between 1 and `MAX_PAGE_SIZE`
    pub fn page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of items. `total_count` counts every item, not only this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total_count: u64, params: PaginationParams) -> Self {
        Self {
            items,
            total_count,
            page: params.page(),
            page_size: params.page_size(),
        }
    }

    /// Number of pages needed for `total_count` items
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size.max(1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_clamped() {
        let params = PaginationParams::new(0, 0);
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 1);

        let params = PaginationParams::new(3, MAX_PAGE_SIZE + 50);
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_defaults_from_empty_query() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::default());
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_and_map() {
        let page = Paginated::new(vec![1, 2], 21, PaginationParams::new(2, 10));
        assert_eq!(page.total_pages(), 3);

        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1", "2"]);
        assert_eq!(mapped.total_count, 21);
        assert_eq!(mapped.page, 2);
    }
}
