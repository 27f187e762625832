//! Client-side paging over an in-memory record list.

use std::ops::Range;

pub const PAGE_SIZE: usize = 10;

/// `ceil(total / PAGE_SIZE)`.
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Cursor over `total` records. Pages are 1-based; an empty list still
/// reports page 1 with an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    page: usize,
}

impl Pager {
    pub fn new(total: usize) -> Self {
        Self { total, page: 1 }
    }

    /// Replace the list length and go back to page 1.
    pub fn reset(&mut self, total: usize) {
        *self = Self::new(total);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total)
    }

    /// Record indices shown on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * PAGE_SIZE).min(self.total);
        let end = (start + PAGE_SIZE).min(self.total);
        start..end
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Step back one page. Returns `false` at the first page.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Step forward one page. Returns `false` at the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }
}
