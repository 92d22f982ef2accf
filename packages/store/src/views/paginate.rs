//! Client-side pagination over an already filtered list.

/// A clamped page window. Pages are 1-indexed; there is always at least one
/// page, even for an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total_count: usize,
}

impl Pagination {
    /// Build a window for `requested_page`, clamping it into `1..=total_pages`.
    /// A zero page size is treated as one item per page.
    pub fn new(requested_page: i64, page_size: usize, total_count: usize) -> Self {
        let mut p = Self {
            page: 1,
            page_size: page_size.max(1),
            total_count,
        };
        p.page = p.clamp(requested_page);
        p
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    fn clamp(&self, requested: i64) -> usize {
        let last = self.total_pages() as i64;
        requested.clamp(1, last) as usize
    }

    /// Index range of the current page, bounded by the item count.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_count);
        let end = (self.page * self.page_size).min(self.total_count);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Next page, or the same page on the last one.
    pub fn next(&self) -> Self {
        Self {
            page: self.clamp(self.page as i64 + 1),
            ..*self
        }
    }

    /// Previous page, or the same page on the first one.
    pub fn prev(&self) -> Self {
        Self {
            page: self.clamp(self.page as i64 - 1),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages(), 1);
        assert_eq!(Pagination::new(1, 10, 1).total_pages(), 1);
        assert_eq!(Pagination::new(1, 10, 10).total_pages(), 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages(), 2);
        assert_eq!(Pagination::new(1, 10, 95).total_pages(), 10);
    }

    #[test]
    fn test_clamps_out_of_range_pages() {
        assert_eq!(Pagination::new(0, 10, 25).page(), 1);
        assert_eq!(Pagination::new(-3, 10, 25).page(), 1);
        assert_eq!(Pagination::new(4, 10, 25).page(), 3);
        assert_eq!(Pagination::new(i64::MAX, 10, 25).page(), 3);
        assert_eq!(Pagination::new(2, 10, 0).page(), 1);
    }

    #[test]
    fn test_slice_windows() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(Pagination::new(1, 10, 25).slice(&items), &items[0..10]);
        assert_eq!(Pagination::new(3, 10, 25).slice(&items), &[21, 22, 23, 24, 25]);
        assert!(Pagination::new(1, 10, 0).slice(&Vec::<u32>::new()).is_empty());
    }

    #[test]
    fn test_navigation_is_noop_at_edges() {
        let first = Pagination::new(1, 10, 25);
        assert!(!first.has_prev());
        assert_eq!(first.prev(), first);

        let last = first.next().next();
        assert_eq!(last.page(), 3);
        assert!(!last.has_next());
        assert_eq!(last.next(), last);
    }
}
