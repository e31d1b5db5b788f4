//! Pagination
//!
//! Pages are 1-indexed. Requests past the end produce an empty page.

use serde::Serialize;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Requested page (page 0 is reported as 1)
    pub page: usize,
    pub page_size: usize,
    /// Total number of records across all pages
    pub total: usize,
    pub total_pages: usize,
}

/// Visible slice of `items` for `page`
///
/// Never panics: an out-of-range page or a zero page size yields an empty
/// slice.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page = page.max(1);
    let Some(start) = (page - 1).checked_mul(page_size) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Build a `Page` from a full listing
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };

    Page {
        items: page_slice(items, page, page_size).to_vec(),
        page: page.max(1),
        page_size,
        total,
        total_pages,
    }
}
