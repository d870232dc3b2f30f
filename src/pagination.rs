//! Pagination state machine. Pure state: page and limit, with total items
//! supplied from outside (usually the last list response).

use crate::response::{total_pages, PageParams};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const LIMIT_OPTIONS: [u32; 4] = [10, 25, 50, 100];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
    total_items: u64,
    initial_page: u32,
    initial_limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(DEFAULT_PAGE, DEFAULT_LIMIT, 0)
    }
}

impl Pagination {
    /// Zero page or limit is coerced to 1.
    pub fn new(initial_page: u32, initial_limit: u32, total_items: u64) -> Self {
        let initial_page = initial_page.max(1);
        let initial_limit = initial_limit.max(1);
        Pagination {
            page: initial_page,
            limit: initial_limit,
            total_items,
            initial_page,
            initial_limit,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.limit)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Update the externally known total. The current page is left alone so a
    /// transient empty response does not move the user.
    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
    }

    /// Clamped into `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        if self.has_next_page() {
            self.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.has_previous_page() {
            self.page -= 1;
        }
    }

    /// Always returns to page 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    pub fn reset(&mut self) {
        self.page = self.initial_page;
        self.limit = self.initial_limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_values() {
        let mut p = Pagination::new(1, 10, 45);
        assert_eq!(p.total_pages(), 5);
        assert_eq!(p.offset(), 0);
        assert!(p.has_next_page());
        assert!(!p.has_previous_page());
        p.go_to_page(3);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.params(), PageParams { page: 3, limit: 10 });
    }

    #[test]
    fn total_pages_matches_ceiling_with_floor_of_one() {
        for total in [0u64, 1, 9, 10, 11, 99, 100, 101, 1000] {
            for limit in [1u32, 3, 10, 25, 100] {
                let p = Pagination::new(1, limit, total);
                let expected = std::cmp::max(1, (total + u64::from(limit) - 1) / u64::from(limit));
                assert_eq!(u64::from(p.total_pages()), expected, "total={} limit={}", total, limit);
            }
        }
    }

    #[test]
    fn go_to_page_always_lands_in_range() {
        let mut p = Pagination::new(1, 10, 35);
        for target in [0u32, 1, 2, 4, 5, 17, u32::MAX] {
            p.go_to_page(target);
            assert!((1..=p.total_pages()).contains(&p.page()), "target {}", target);
        }
        p.go_to_page(99);
        assert_eq!(p.page(), 4);
        p.go_to_page(0);
        assert_eq!(p.page(), 1);

        let mut empty = Pagination::default();
        empty.go_to_page(3);
        assert_eq!(empty.page(), 1);
    }

    #[test]
    fn next_and_previous_stop_at_boundaries() {
        let mut p = Pagination::new(1, 10, 20);
        p.previous_page();
        assert_eq!(p.page(), 1);
        p.next_page();
        p.next_page();
        p.next_page();
        assert_eq!(p.page(), 2);
        assert!(!p.has_next_page());
    }

    #[test]
    fn set_limit_resets_page() {
        let mut p = Pagination::new(1, 10, 100);
        p.go_to_page(7);
        p.set_limit(25);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 25);
        assert_eq!(p.total_pages(), 4);
        p.set_limit(0);
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut p = Pagination::new(2, 25, 200);
        p.set_limit(50);
        p.go_to_page(4);
        p.reset();
        assert_eq!((p.page(), p.limit()), (2, 25));
        assert_eq!(LIMIT_OPTIONS[0], DEFAULT_LIMIT);
    }
}
