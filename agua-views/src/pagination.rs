//! Page-number window for pagination controls.

/// Maximum number of page numbers shown before the window collapses.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One entry of the page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// Computes which page numbers to show around `current_page`.
///
/// - up to [`MAX_VISIBLE_PAGES`] pages: all of them
/// - near the start: `1 2 3 4 … N`
/// - near the end: `1 … N-3 N-2 N-1 N`
/// - otherwise: `1 … p-1 p p+1 … N`
///
/// # Example
///
/// ```
/// use agua_views::pagination::{page_window, PageMarker::*};
///
/// assert_eq!(
///     page_window(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// ```
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<PageMarker> {
    use PageMarker::*;

    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total_pages)]
    } else if current_page >= total_pages - 2 {
        let mut window = vec![Page(1), Ellipsis];
        window.extend((total_pages - 3..=total_pages).map(Page));
        window
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current_page - 1),
            Page(current_page),
            Page(current_page + 1),
            Ellipsis,
            Page(total_pages),
        ]
    }
}

/// Number of pages needed for `items` at `per_page` items each.
pub fn total_pages(items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    items.div_ceil(per_page)
}

/// Current page of a paginated list.
///
/// Navigation refuses to leave `1..=total_pages`; the current page is clamped
/// back into range when the list shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    per_page: usize,
}

impl Pagination {
    /// Starts at page 1. A `per_page` of zero is treated as one.
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Pulls the current page back to the last page of `total_items`.
    pub fn clamp(&mut self, total_items: usize) {
        let last = total_pages(total_items, self.per_page).max(1);
        self.page = self.page.clamp(1, last);
    }

    /// Index range of the current page's items.
    pub fn range(&self, total_items: usize) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.per_page).min(total_items);
        let end = (start + self.per_page).min(total_items);
        start..end
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self, total_items: usize) -> bool {
        self.page < total_pages(total_items, self.per_page)
    }

    /// Moves to `page` if it exists. Returns whether the page changed.
    pub fn go_to(&mut self, page: usize, total_items: usize) -> bool {
        if page == 0 || page > total_pages(total_items, self.per_page) || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next(&mut self, total_items: usize) -> bool {
        self.go_to(self.page + 1, total_items)
    }

    pub fn prev(&mut self, total_items: usize) -> bool {
        self.page > 1 && self.go_to(self.page - 1, total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::PageMarker::*;
    use super::*;

    fn contains(window: &[PageMarker], page: usize) -> bool {
        window.contains(&Page(page))
    }

    #[test]
    fn test_small_totals_show_everything() {
        assert!(page_window(1, 0).is_empty());
        for total in 1..=MAX_VISIBLE_PAGES {
            for current in 1..=total {
                let expected: Vec<_> = (1..=total).map(Page).collect();
                assert_eq!(page_window(current, total), expected);
            }
        }
    }

    #[test]
    fn test_window_near_start() {
        assert_eq!(
            page_window(3, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(
            page_window(8, 10),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_window_bounds_for_large_totals() {
        for total in 6..=40 {
            for current in 1..=total {
                let window = page_window(current, total);
                assert!(window.len() <= 7, "{current}/{total}: {window:?}");
                assert!(contains(&window, 1));
                assert!(contains(&window, total));
                assert!(contains(&window, current));
            }
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let mut pagination = Pagination::new(10);
        assert!(pagination.next(23));
        assert!(pagination.next(23));
        assert_eq!(pagination.page(), 3);
        assert!(!pagination.can_next(23));
        assert!(!pagination.next(23));
        assert!(!pagination.go_to(4, 23));
        assert_eq!(pagination.page(), 3);
        assert_eq!(pagination.range(23), 20..23);
    }

    #[test]
    fn test_prev_stops_at_first_page() {
        let mut pagination = Pagination::new(10);
        assert!(!pagination.can_prev());
        assert!(!pagination.prev(23));
        assert!(!pagination.go_to(0, 23));
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut pagination = Pagination::new(10);
        pagination.go_to(3, 23);
        pagination.clamp(12);
        assert_eq!(pagination.page(), 2);
        pagination.clamp(0);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.range(0), 0..0);
    }
}
