//! Parameterized SQL, one module per table family

pub mod cart;
pub mod categories;
pub mod customers;
pub mod grades;
pub mod orders;
pub mod pages;
pub mod products;
pub mod registration_links;
pub mod sellers;
pub mod settings;
pub mod slides;
pub mod users;
pub mod variants;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: PageRequest) -> Self {
        Self { data, total, page: page.page, per_page: page.per_page }
    }
}

/// `None` for blank search strings so SQL can skip the filter.
pub fn search_term(search: Option<&str>) -> Option<String> {
    search.map(str::trim).filter(|s| !s.is_empty()).map(|s| format!("%{s}%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        let p = PageRequest::new(None, None);
        assert_eq!((p.page, p.per_page, p.offset()), (1, 20, 0));

        let p = PageRequest::new(Some(0), Some(500));
        assert_eq!((p.page, p.per_page), (1, 100));

        let p = PageRequest::new(Some(3), Some(25));
        assert_eq!((p.limit(), p.offset()), (25, 50));
    }

    #[test]
    fn test_search_term() {
        assert_eq!(search_term(Some("  tee ")), Some("%tee%".into()));
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(None), None);
    }
}
