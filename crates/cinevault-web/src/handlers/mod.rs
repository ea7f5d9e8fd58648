//! HTTP handlers, one module per resource.

pub mod cast;
pub mod companies;
pub mod genres;
pub mod ingest;
pub mod movies;
pub mod stats;

use serde::{Deserialize, Serialize};

/// Zero-based paging query parameters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    20
}

/// Clamp paging input: page is floored at 0, size lands in 1..=100.
pub(crate) fn clamp_page(page: i64, size: i64) -> (i64, i64) {
    (page.max(0), size.clamp(1, 100))
}

/// Paged response envelope.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: i64, size: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 { 0 } else { (total_items + size - 1) / size };
        Self { items, page, size, total_items, total_pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_page_and_size() {
        assert_eq!(clamp_page(-3, 20), (0, 20));
        assert_eq!(clamp_page(2, 0), (2, 1));
        assert_eq!(clamp_page(2, 5000), (2, 100));
        assert_eq!(clamp_page(0, 20), (0, 20));
    }

    #[test]
    fn paged_envelope_computes_totals() {
        let paged = Paged::new(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(paged.total_pages, 3);

        let empty: Paged<i32> = Paged::new(Vec::new(), 0, 20, 0);
        assert_eq!(empty.total_pages, 0);

        let exact = Paged::new(vec![1, 2], 0, 2, 4);
        assert_eq!(exact.total_pages, 2);
    }
}
