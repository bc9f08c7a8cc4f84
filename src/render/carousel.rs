//! Carousel paging math.
//!
//! Only indices are tracked here; pixel offsets and animation belong to the
//! page's stylesheet.

/// Cards visible at once for a viewport width in CSS pixels
pub fn cards_per_view_for_width(width: u32) -> usize {
    match width {
        0..=639 => 1,
        640..=1023 => 2,
        1024..=1439 => 3,
        _ => 4,
    }
}

/// How far one press of next/prev moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One card at a time (music)
    Card,
    /// A full view at a time (games)
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    per_view: usize,
    step: Step,
    index: usize,
}

impl Carousel {
    pub fn new(len: usize, per_view: usize, step: Step) -> Self {
        Self {
            len,
            per_view: per_view.max(1),
            step,
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn per_view(&self) -> usize {
        self.per_view
    }

    /// Change the view size (e.g. on resize), keeping the index in range
    pub fn set_per_view(&mut self, per_view: usize) {
        self.per_view = per_view.max(1);
        self.index = self.index.min(self.max_index());
    }

    pub fn max_index(&self) -> usize {
        self.len.saturating_sub(self.per_view)
    }

    fn step_size(&self) -> usize {
        match self.step {
            Step::Card => 1,
            Step::Page => self.per_view,
        }
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + self.step_size()).min(self.max_index());
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = self.index.saturating_sub(self.step_size());
        self.index
    }

    /// Jump to a page, clamped to the last reachable index
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.index = page.saturating_mul(self.per_view).min(self.max_index());
        self.index
    }

    pub fn page_count(&self) -> usize {
        self.len.div_ceil(self.per_view)
    }

    pub fn current_page(&self) -> usize {
        self.index / self.per_view
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index < self.max_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_per_view_breakpoints() {
        assert_eq!(cards_per_view_for_width(320), 1);
        assert_eq!(cards_per_view_for_width(640), 2);
        assert_eq!(cards_per_view_for_width(1023), 2);
        assert_eq!(cards_per_view_for_width(1024), 3);
        assert_eq!(cards_per_view_for_width(1440), 4);
    }

    #[test]
    fn test_card_step_bounds() {
        let mut c = Carousel::new(6, 4, Step::Card);
        assert!(!c.can_prev());
        assert_eq!(c.next(), 1);
        assert_eq!(c.next(), 2);
        assert_eq!(c.next(), 2);
        assert!(!c.can_next());
        assert_eq!(c.prev(), 1);
    }

    #[test]
    fn test_page_step_and_pages() {
        let mut c = Carousel::new(10, 4, Step::Page);
        assert_eq!(c.page_count(), 3);
        assert_eq!(c.next(), 4);
        assert_eq!(c.next(), 6);
        assert_eq!(c.current_page(), 1);
        assert_eq!(c.prev(), 2);
        assert_eq!(c.prev(), 0);
        assert_eq!(c.go_to_page(2), 6);
    }

    #[test]
    fn test_fewer_items_than_view() {
        let mut c = Carousel::new(2, 4, Step::Page);
        assert_eq!(c.max_index(), 0);
        assert_eq!(c.next(), 0);
        assert!(!c.can_next());
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn test_huge_page_clamps_to_last() {
        let mut c = Carousel::new(10, 3, Step::Page);
        assert_eq!(c.go_to_page(usize::MAX), c.max_index());
    }

    #[test]
    fn test_resize_clamps_index() {
        let mut c = Carousel::new(8, 2, Step::Card);
        c.go_to_page(3);
        assert_eq!(c.index(), 6);
        c.set_per_view(4);
        assert_eq!(c.index(), 4);
    }
}
