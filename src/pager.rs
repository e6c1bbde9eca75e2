//! Defines the [`Pager`], an append-only cursor that hands out fixed-size
//! pages of a sequence for infinite scrolling.

/// A zero-based page cursor with a fixed page size. The pager doesn't own the
/// sequence it pages over; callers pass it in on every call and must
/// [`Pager::reset`] whenever that sequence changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    cursor: usize,
}

impl Pager {
    /// Creates a pager at cursor 0. A `page_size` of 0 is treated as 1 so the
    /// pager always makes progress.
    pub fn new(page_size: usize) -> Pager {
        Pager {
            page_size: page_size.max(1),
            cursor: 0,
        }
    }

    /// Returns the next page, `items[cursor*size..(cursor+1)*size]` clamped
    /// to the end of `items`, and advances the cursor. Returns `None` once
    /// `items` is exhausted; the cursor stays put in that case.
    pub fn next_page<'a, T>(&mut self, items: &'a [T]) -> Option<&'a [T]> {
        let start = self.start();
        if start >= items.len() {
            return None;
        }
        let end = (start + self.page_size).min(items.len());
        self.cursor += 1;
        Some(&items[start..end])
    }

    /// Moves the cursor back to the first page.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// True when every one of `len` items has been handed out.
    pub fn is_exhausted(&self, len: usize) -> bool {
        self.start() >= len
    }

    /// The number of items already handed out from a sequence of `len` items.
    pub fn consumed(&self, len: usize) -> usize {
        self.start().min(len)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn start(&self) -> usize {
        self.cursor * self.page_size
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pages_concatenate_to_sequence() {
        let items: Vec<u32> = (0..23).collect();
        let mut pager = Pager::new(10);
        let mut seen = Vec::new();
        let mut sizes = Vec::new();
        while let Some(page) = pager.next_page(&items) {
            sizes.push(page.len());
            seen.extend_from_slice(page);
        }
        assert_eq!(vec![10, 10, 3], sizes);
        assert_eq!(items, seen);
        assert_eq!(3, pager.cursor());
        assert!(pager.is_exhausted(items.len()));
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let items = [1, 2, 3];
        let mut pager = Pager::new(10);
        assert_eq!(Some(&items[..]), pager.next_page(&items));
        assert_eq!(None, pager.next_page(&items));
        assert_eq!(None, pager.next_page(&items));
        assert_eq!(1, pager.cursor());
        assert_eq!(3, pager.consumed(items.len()));
    }

    #[test]
    fn test_exact_multiple() {
        let items: Vec<u32> = (0..20).collect();
        let mut pager = Pager::new(10);
        assert!(pager.next_page(&items).is_some());
        assert!(!pager.is_exhausted(items.len()));
        assert!(pager.next_page(&items).is_some());
        assert!(pager.is_exhausted(items.len()));
        assert_eq!(None, pager.next_page(&items));
    }

    #[test]
    fn test_empty_sequence() {
        let items: [u32; 0] = [];
        let mut pager = Pager::new(10);
        assert!(pager.is_exhausted(0));
        assert_eq!(None, pager.next_page(&items));
        assert_eq!(0, pager.cursor());
    }

    #[test]
    fn test_reset() {
        let items: Vec<u32> = (0..15).collect();
        let mut pager = Pager::new(5);
        pager.next_page(&items);
        pager.next_page(&items);
        pager.reset();
        assert_eq!(0, pager.cursor());
        assert_eq!(Some(&items[0..5]), pager.next_page(&items));
    }

    #[test]
    fn test_zero_page_size() {
        let items = [1, 2];
        let mut pager = Pager::new(0);
        assert_eq!(1, pager.page_size());
        assert_eq!(Some(&items[0..1]), pager.next_page(&items));
        assert_eq!(Some(&items[1..2]), pager.next_page(&items));
        assert_eq!(None, pager.next_page(&items));
    }
}
