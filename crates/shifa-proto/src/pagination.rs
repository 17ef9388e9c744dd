//! Pager: zero-based page index plus page size.
//!
//! There is no known upper bound: the server decides whether more records
//! exist, and an empty page is the end-of-data signal.

pub use crate::config::DEFAULT_PAGE_SIZE;

/// Sizes offered by the `+`/`-` page-size control.
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 50, 100];

/// One offset-addressed slice to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Records to skip: `page_index * page_size`.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_index: usize,
    page_size: usize,
}

impl Pager {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }

    /// Always advances.
    pub fn next(&mut self) -> PageRequest {
        self.page_index = self.page_index.saturating_add(1);
        self.request()
    }

    /// Steps back one page. Returns `None` (and changes nothing) on page 0.
    pub fn previous(&mut self) -> Option<PageRequest> {
        if self.page_index == 0 {
            return None;
        }
        self.page_index -= 1;
        Some(self.request())
    }

    /// Drives the enabled state of the "Précédent" control.
    pub fn can_go_back(&self) -> bool {
        self.page_index > 0
    }

    /// Jump to an absolute page. `None` when already there.
    pub fn go_to(&mut self, page_index: usize) -> Option<PageRequest> {
        if page_index == self.page_index {
            return None;
        }
        self.page_index = page_index;
        Some(self.request())
    }

    /// Change the page size and return to page 0. `None` when unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> Option<PageRequest> {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return None;
        }
        self.page_size = page_size;
        self.page_index = 0;
        Some(self.request())
    }

    /// The next entry of `PAGE_SIZES` above (or below) the current size,
    /// clamped to the ends of the ladder.
    pub fn stepped_size(&self, larger: bool) -> usize {
        let step = if larger {
            PAGE_SIZES.iter().find(|&&n| n > self.page_size)
        } else {
            PAGE_SIZES.iter().rev().find(|&&n| n < self.page_size)
        };
        match step {
            Some(&n) => n,
            None if larger => PAGE_SIZES[PAGE_SIZES.len() - 1].max(self.page_size),
            None => PAGE_SIZES[0].min(self.page_size),
        }
    }

    /// Human page number for display ("page 1").
    pub fn display_number(&self) -> usize {
        self.page_index.saturating_add(1)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// An empty page means the server has nothing past this offset.
pub fn is_end_of_data<T>(page: &[T]) -> bool {
    page.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_with_default_size() {
        let pager = Pager::default();
        assert_eq!(pager.page_index(), 0);
        assert_eq!(pager.page_size(), 30);
        assert_eq!(pager.request().offset(), 0);
        assert!(!pager.can_go_back());
    }

    #[test]
    fn offset_is_index_times_size() {
        let mut pager = Pager::new(30);
        for expected in 1..=5usize {
            let req = pager.next();
            assert_eq!(req.page_index, expected);
            assert_eq!(req.offset(), expected * 30);
        }
    }

    #[test]
    fn previous_at_zero_is_a_noop() {
        let mut pager = Pager::new(30);
        assert_eq!(pager.previous(), None);
        assert_eq!(pager.previous(), None);
        assert_eq!(pager.page_index(), 0);

        pager.next();
        let back = pager.previous().unwrap();
        assert_eq!(back.page_index, 0);
        assert_eq!(pager.previous(), None);
    }

    #[test]
    fn resizing_resets_to_first_page() {
        let mut pager = Pager::new(30);
        pager.next();
        pager.next();
        assert_eq!(pager.set_page_size(30), None);
        assert_eq!(pager.page_index(), 2);
        let req = pager.set_page_size(50).unwrap();
        assert_eq!(req, PageRequest { page_index: 0, page_size: 50 });
        assert_eq!(Pager::new(0).page_size(), 1);
    }

    #[test]
    fn size_steps_follow_the_ladder() {
        let pager = Pager::new(30);
        assert_eq!(pager.stepped_size(true), 50);
        assert_eq!(pager.stepped_size(false), 20);
        // Off-ladder sizes snap to the neighbouring rung.
        assert_eq!(Pager::new(25).stepped_size(true), 30);
        assert_eq!(Pager::new(25).stepped_size(false), 20);
        // Ends of the ladder stay put.
        assert_eq!(Pager::new(100).stepped_size(true), 100);
        assert_eq!(Pager::new(10).stepped_size(false), 10);
        assert_eq!(Pager::new(500).stepped_size(true), 500);
        assert_eq!(Pager::new(3).stepped_size(false), 3);
    }

    #[test]
    fn go_to_same_page_issues_nothing() {
        let mut pager = Pager::new(10);
        assert_eq!(pager.go_to(0), None);
        assert_eq!(pager.go_to(4).unwrap().offset(), 40);
        assert_eq!(pager.display_number(), 5);
    }

    #[test]
    fn huge_index_saturates() {
        let mut pager = Pager::new(30);
        pager.go_to(usize::MAX);
        assert_eq!(pager.display_number(), usize::MAX);
        assert_eq!(pager.next().page_index, usize::MAX);
        assert_eq!(pager.request().offset(), usize::MAX);
    }

    #[test]
    fn empty_page_ends_data() {
        assert!(is_end_of_data::<u8>(&[]));
        assert!(!is_end_of_data(&[1]));
    }
}
