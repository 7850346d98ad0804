//! Page slicing for filtered listings.

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Splits a listing into fixed-size, 1-based pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Clamps a requested page into `1..=max(total_pages, 1)`.
    pub fn clamp_page(&self, requested: usize, total_items: usize) -> usize {
        requested.clamp(1, self.total_pages(total_items).max(1))
    }

    pub fn page<'a, T>(&self, items: &'a [T], requested: usize) -> Page<'a, T> {
        let total_items = items.len();
        let page = self.clamp_page(requested, total_items);
        let start = ((page - 1) * self.page_size).min(total_items);
        let end = (start + self.page_size).min(total_items);
        Page {
            items: &items[start..end],
            page,
            total_pages: self.total_pages(total_items),
            total_items,
        }
    }
}

/// One page of a listing plus the figures needed for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pages_of_requested_size() {
        let items: Vec<u32> = (1..=23).collect();
        let paginator = Paginator::default();

        let first = paginator.page(&items, 1);
        assert_eq!(first.items, &items[..10]);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginator.page(&items, 3);
        assert_eq!(last.items, &[21u32, 22, 23]);
        assert!(!last.has_next());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let items: Vec<u32> = (1..=15).collect();
        let paginator = Paginator::new(10);
        assert_eq!(paginator.page(&items, 0).page, 1);
        let beyond = paginator.page(&items, 9);
        assert_eq!(beyond.page, 2);
        assert_eq!(beyond.items.len(), 5);
    }

    #[test]
    fn shrinking_listing_pulls_current_page_back() {
        let paginator = Paginator::new(5);
        assert_eq!(paginator.clamp_page(4, 20), 4);
        assert_eq!(paginator.clamp_page(4, 7), 2);
    }

    #[test]
    fn empty_listing_reports_page_one_of_zero() {
        let items: Vec<u32> = Vec::new();
        let page = Paginator::new(10).page(&items, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        assert_eq!(Paginator::new(0).page_size(), 1);
    }
}
