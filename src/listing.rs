//! The writing page's search and infinite-scroll state machine. A single
//! [`SearchPager`] is built per page load and owns the page cursor, the
//! filtered view, and the "search active" flag. Everything runs to completion
//! on the caller's thread; time is passed in so scroll debouncing is
//! deterministic.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::article::ArticleRecord;
use crate::pager::Pager;
use crate::render::{article_fragment, RenderSink};
use crate::search;

/// How long scrolling has to pause before the scroll position is checked.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);

/// More articles load once the viewport bottom is within this many pixels of
/// the page bottom.
pub const SCROLL_THRESHOLD: f64 = 200.0;

/// Keys the search input reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Scroll geometry sampled when a debounced scroll check runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// The height of the visible area.
    pub inner_height: f64,

    /// How far the page is scrolled down.
    pub scroll_offset: f64,

    /// The full height of the page.
    pub scroll_height: f64,
}

impl Viewport {
    /// True when the bottom of the viewport is within [`SCROLL_THRESHOLD`] of
    /// the bottom of the page.
    pub fn near_bottom(&self) -> bool {
        self.inner_height + self.scroll_offset >= self.scroll_height - SCROLL_THRESHOLD
    }
}

/// A trailing debounce: every trigger pushes the deadline back, and the
/// debounce fires once when polled after the deadline.
#[derive(Clone, Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Debounce {
        Debounce {
            delay,
            deadline: None,
        }
    }

    /// Arms (or re-arms) the debounce at `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true exactly once per armed deadline that `now` has reached.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Search, pagination, and rendering state for one page load.
pub struct SearchPager<'a, S> {
    records: &'a [ArticleRecord],
    filtered: Vec<&'a ArticleRecord>,
    pager: Pager,
    searching: bool,
    query: String,
    scroll: Debounce,
    sink: S,
}

impl<'a, S: RenderSink> SearchPager<'a, S> {
    /// Creates the state for a page showing `records` `page_size` at a time.
    /// Nothing is rendered until [`SearchPager::load`] is called.
    pub fn new(records: &'a [ArticleRecord], page_size: usize, sink: S) -> Self {
        SearchPager {
            records,
            filtered: records.iter().collect(),
            pager: Pager::new(page_size),
            searching: false,
            query: String::new(),
            scroll: Debounce::new(SCROLL_DEBOUNCE),
            sink,
        }
    }

    /// The initial load: renders the first page of the full catalog.
    pub fn load(&mut self) -> usize {
        self.load_more()
    }

    /// Renders the next page of the filtered view and returns how many
    /// articles were appended. Hides the "loading" indicator once the whole
    /// view has been rendered.
    pub fn load_more(&mut self) -> usize {
        let filtered = &self.filtered;
        let page = match self.pager.next_page(filtered) {
            Some(page) => page,
            None => {
                self.sink.set_loading(false);
                return 0;
            }
        };
        for article in page {
            self.sink.append(&article_fragment(article));
        }
        let appended = page.len();
        if self.pager.is_exhausted(filtered.len()) {
            self.sink.set_loading(false);
        }
        debug!(
            appended,
            cursor = self.pager.cursor(),
            total = filtered.len(),
            "loaded page"
        );
        appended
    }

    /// Handles a change to the search input. The filtered view is recomputed
    /// from scratch, the container cleared, and the first page rendered.
    pub fn on_input(&mut self, value: &str) {
        let term = value.trim().to_lowercase();
        self.searching = !term.is_empty();
        self.filtered = search::filter(self.records, &term);
        self.query = term;

        self.sink.clear();
        self.pager.reset();
        self.load_more();

        if self.searching {
            self.sink.set_no_results(self.filtered.is_empty());
            self.sink.set_loading(false);
        } else {
            self.sink.set_no_results(false);
            if !self.pager.is_exhausted(self.filtered.len()) {
                self.sink.set_loading(true);
            }
        }
        debug!(
            query = %self.query,
            matches = self.filtered.len(),
            "search input"
        );
    }

    /// Handles a key press in the search input. Escape clears the query and
    /// restores the unfiltered view; other keys are ignored. Returns whether
    /// the key was handled.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => {
                self.on_input("");
                true
            }
            Key::Other => false,
        }
    }

    /// Records a scroll event. The position check happens in
    /// [`SearchPager::poll`] once scrolling has paused.
    pub fn on_scroll(&mut self, now: Instant) {
        self.scroll.trigger(now);
    }

    /// Runs the debounced scroll check if it's due. Loads another page when
    /// the viewport is near the bottom and no search is active. Returns the
    /// number of articles appended.
    pub fn poll(&mut self, now: Instant, viewport: Viewport) -> usize {
        if !self.scroll.fire(now) || self.searching {
            return 0;
        }
        match viewport.near_bottom() {
            true => self.load_more(),
            false => 0,
        }
    }

    /// The current filtered view.
    pub fn filtered(&self) -> &[&'a ArticleRecord] {
        &self.filtered
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// The normalized (trimmed, lowercased) active query.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.pager.cursor()
    }

    /// How many articles of the filtered view have been rendered.
    pub fn shown(&self) -> usize {
        self.pager.consumed(self.filtered.len())
    }

    /// True once the whole filtered view has been rendered.
    pub fn is_exhausted(&self) -> bool {
        self.pager.is_exhausted(self.filtered.len())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::article::test::{record, sample};
    use crate::render::{Document, Visibility};
    use pretty_assertions::assert_eq;

    fn many(n: usize) -> Vec<ArticleRecord> {
        (0..n)
            .map(|i| {
                record(
                    &format!("Post {}", i),
                    if i % 2 == 0 { "even" } else { "odd" },
                    &format!("articles/post-{}/", i),
                    "2025-01-01",
                )
            })
            .collect()
    }

    fn rendered_urls(doc: &Document) -> Vec<String> {
        doc.fragments()
            .unwrap_or_default()
            .iter()
            .map(|f| {
                let start = f.find("href=\"").map(|i| i + 6).unwrap_or(0);
                let end = start + f[start..].find('"').unwrap_or(0);
                f[start..end].to_owned()
            })
            .collect()
    }

    const BOTTOM: Viewport = Viewport {
        inner_height: 800.0,
        scroll_offset: 1200.0,
        scroll_height: 2100.0,
    };

    const TOP: Viewport = Viewport {
        inner_height: 800.0,
        scroll_offset: 0.0,
        scroll_height: 2100.0,
    };

    #[test]
    fn test_initial_load_of_small_catalog() {
        let records = sample();
        let mut pager = SearchPager::new(&records, 10, Document::new());
        assert_eq!(3, pager.load());

        let doc = pager.sink();
        let wanted: Vec<String> = records.iter().map(|r| r.url.clone()).collect();
        assert_eq!(wanted, rendered_urls(doc));
        assert_eq!(Some(Visibility::Hidden), doc.loading());
        assert_eq!(Some(Visibility::Hidden), doc.no_results());
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_shown_counts_articles_not_pages() {
        let records = sample();
        let mut pager = SearchPager::new(&records, 10, Document::without_indicators());
        pager.on_input("e");
        assert_eq!(1, pager.cursor());
        assert_eq!(3, pager.shown());

        let records = many(25);
        let mut pager = SearchPager::new(&records, 10, Document::without_indicators());
        pager.load();
        assert_eq!(10, pager.shown());
        pager.load_more();
        pager.load_more();
        assert_eq!(25, pager.shown());
    }

    #[test]
    fn test_search_internet() {
        let records = sample();
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();
        pager.on_input("  Internet ");

        assert!(pager.is_searching());
        assert_eq!("internet", pager.query());
        assert_eq!(
            vec!["articles/my-job-is-internet.html".to_owned()],
            rendered_urls(pager.sink())
        );
        assert_eq!(Some(Visibility::Hidden), pager.sink().no_results());
        assert_eq!(Some(Visibility::Hidden), pager.sink().loading());
    }

    #[test]
    fn test_search_without_matches_shows_no_results() {
        let records = sample();
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();
        pager.on_input("zzz");

        assert!(pager.filtered().is_empty());
        assert_eq!(Some(0), pager.sink().fragments().map(|f| f.len()));
        assert_eq!(Some(Visibility::Shown), pager.sink().no_results());
        assert_eq!(Some(Visibility::Hidden), pager.sink().loading());
    }

    #[test]
    fn test_scroll_pages_through_everything() {
        let records = many(25);
        let mut pager = SearchPager::new(&records, 10, Document::new());
        assert_eq!(10, pager.load());
        assert_eq!(Some(Visibility::Shown), pager.sink().loading());

        let t0 = Instant::now();
        let mut appended = Vec::new();
        for i in 0..4u64 {
            let at = t0 + Duration::from_secs(i);
            pager.on_scroll(at);
            appended.push(pager.poll(at + SCROLL_DEBOUNCE, BOTTOM));
        }
        assert_eq!(vec![10, 5, 0, 0], appended);

        let wanted: Vec<String> = records.iter().map(|r| r.url.clone()).collect();
        assert_eq!(wanted, rendered_urls(pager.sink()));
        assert_eq!(Some(Visibility::Hidden), pager.sink().loading());
    }

    #[test]
    fn test_scroll_is_debounced() {
        let records = many(25);
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();

        let t0 = Instant::now();
        pager.on_scroll(t0);
        pager.on_scroll(t0 + Duration::from_millis(60));
        // 100ms after the first event but only 40ms after the last
        assert_eq!(0, pager.poll(t0 + Duration::from_millis(100), BOTTOM));
        assert_eq!(10, pager.poll(t0 + Duration::from_millis(160), BOTTOM));
        // fired already; nothing pending
        assert_eq!(0, pager.poll(t0 + Duration::from_millis(500), BOTTOM));
        assert_eq!(2, pager.cursor());
    }

    #[test]
    fn test_scroll_far_from_bottom_does_nothing() {
        let records = many(25);
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();
        let t0 = Instant::now();
        pager.on_scroll(t0);
        assert_eq!(0, pager.poll(t0 + SCROLL_DEBOUNCE, TOP));
        assert_eq!(1, pager.cursor());
    }

    #[test]
    fn test_scroll_ignored_while_searching() {
        let records = many(30);
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();
        pager.on_input("even");
        assert_eq!(15, pager.filtered().len());
        assert_eq!(10, pager.sink().fragments().map_or(0, |f| f.len()));

        let t0 = Instant::now();
        pager.on_scroll(t0);
        assert_eq!(0, pager.poll(t0 + SCROLL_DEBOUNCE, BOTTOM));
        assert_eq!(10, pager.sink().fragments().map_or(0, |f| f.len()));
    }

    #[test]
    fn test_escape_restores_full_view() {
        let records = many(25);
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();
        let before: Vec<ArticleRecord> = pager.filtered().iter().map(|r| (*r).clone()).collect();

        pager.on_input("odd");
        assert_eq!(12, pager.filtered().len());
        assert!(pager.on_key(Key::Escape));

        let after: Vec<ArticleRecord> = pager.filtered().iter().map(|r| (*r).clone()).collect();
        assert_eq!(before, after);
        assert!(!pager.is_searching());
        assert_eq!("", pager.query());
        // the first page has been rendered again from cursor 0
        assert_eq!(1, pager.cursor());
        assert_eq!(10, pager.sink().fragments().map_or(0, |f| f.len()));
        assert_eq!(Some(Visibility::Hidden), pager.sink().no_results());
        assert_eq!(Some(Visibility::Shown), pager.sink().loading());
    }

    #[test]
    fn test_emptying_input_matches_escape() {
        let records = sample();
        let mut by_escape = SearchPager::new(&records, 2, Document::new());
        let mut by_input = SearchPager::new(&records, 2, Document::new());
        for pager in &mut [&mut by_escape, &mut by_input] {
            pager.load();
            pager.on_input("zzz");
        }
        by_escape.on_key(Key::Escape);
        by_input.on_input("   ");
        assert_eq!(by_escape.sink(), by_input.sink());
        assert_eq!(by_escape.cursor(), by_input.cursor());
    }

    #[test]
    fn test_other_keys_ignored() {
        let records = sample();
        let mut pager = SearchPager::new(&records, 10, Document::new());
        pager.load();
        pager.on_input("internet");
        assert!(!pager.on_key(Key::Other));
        assert!(pager.is_searching());
    }

    #[test]
    fn test_missing_elements_degrade() {
        let records = many(12);
        let mut pager = SearchPager::new(&records, 10, Document::default());
        assert_eq!(10, pager.load());
        pager.on_input("zzz");
        pager.on_key(Key::Escape);
        assert_eq!(Document::default(), pager.into_sink());
    }

    #[test]
    fn test_works_through_mut_ref_sink() {
        let records = sample();
        let mut doc = Document::new();
        {
            let mut pager = SearchPager::new(&records, 1, &mut doc);
            pager.load();
            pager.load_more();
        }
        assert_eq!(2, doc.fragments().map_or(0, |f| f.len()));
        assert_eq!(Some(Visibility::Shown), doc.loading());
    }

    #[test]
    fn test_debounce() {
        let mut debounce = Debounce::new(Duration::from_millis(100));
        let t0 = Instant::now();
        assert!(!debounce.fire(t0));
        debounce.trigger(t0);
        assert!(debounce.is_pending());
        assert!(!debounce.fire(t0 + Duration::from_millis(99)));
        assert!(debounce.fire(t0 + Duration::from_millis(100)));
        assert!(!debounce.is_pending());
    }
}
