//! Pagination utilities for the review workbench
//!
//! Fixed 50 rows per page over the filtered view. There is always at least
//! one page, even when the view is empty.

/// Page size constant for all pagination
pub const PAGE_SIZE: usize = 50;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages (never 0)
    pub total_pages: usize,
    /// Index of the first item on the page
    pub offset: usize,
}

/// Number of pages needed for `total_results` items
pub fn total_pages(total_results: usize) -> usize {
    total_results.div_ceil(PAGE_SIZE).max(1)
}

/// Calculate pagination metadata from total results and requested page
///
/// Clamps the page into `[1, total_pages]`.
///
/// # Examples
/// ```
/// use halunder_review::pagination::calculate_pagination;
///
/// // 120 results = 3 pages (50 + 50 + 20)
/// let p = calculate_pagination(120, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 50);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(120, 99);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 100);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize) -> Pagination {
    let total_pages = total_pages(total_results);
    let page = requested_page.clamp(1, total_pages);
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

/// Items shown on `requested_page` of `items`, with the clamped metadata
pub fn page_slice<T>(items: &[T], requested_page: usize) -> (&[T], Pagination) {
    let p = calculate_pagination(items.len(), requested_page);
    let end = (p.offset + PAGE_SIZE).min(items.len());
    let start = p.offset.min(end);
    (&items[start..end], p)
}

/// Current-page tracker
///
/// Stepping past either end is refused rather than wrapped; callers use
/// `can_prev` / `can_next` to disable the affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Back to page 1; called whenever the filtered view changes
    pub fn reset(&mut self) {
        self.current = 1;
    }

    pub fn can_prev(&self) -> bool {
        self.current > 1
    }

    pub fn can_next(&self, total_items: usize) -> bool {
        self.current < total_pages(total_items)
    }

    /// Step forward; false (no change) on the last page
    pub fn next(&mut self, total_items: usize) -> bool {
        if !self.can_next(total_items) {
            return false;
        }
        self.current += 1;
        true
    }

    /// Step back; false (no change) on page 1
    pub fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `page`; false (no change) when outside `[1, total_pages]`
    pub fn go_to(&mut self, page: usize, total_items: usize) -> bool {
        if page < 1 || page > total_pages(total_items) {
            return false;
        }
        self.current = page;
        true
    }
}
