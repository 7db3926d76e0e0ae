// Pagination Stage - fixed-size pages over the ordered sequence

use serde::Serialize;

/// Rows per page in the console and in `view` output
pub const PAGE_SIZE: usize = 20;

/// Page buttons shown at once
const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// 1-based page number actually served
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Up to five page numbers around the current one for page buttons
    pub fn window(&self) -> Vec<usize> {
        page_window(self.number, self.total_pages)
    }
}

/// ceil(len / PAGE_SIZE), never less than 1
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

/// Clamp a stored page number into [1, total_pages]
pub fn reconcile_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)` clamped to bounds.
/// A page past the end yields an empty slice instead of panicking.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Reconcile the requested page against `items`, then slice it
pub fn paginate<T: Clone>(items: &[T], requested: usize) -> Page<T> {
    let total_pages = total_pages(items.len());
    let number = reconcile_page(requested, total_pages);

    Page {
        number,
        total_pages,
        total_items: items.len(),
        items: page_slice(items, number).to_vec(),
    }
}

pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    let start = if current <= 3 { 1 } else { current - 2 };
    (start..start + PAGE_WINDOW.min(total_pages))
        .filter(|n| *n >= 1 && *n <= total_pages)
        .collect()
}
