//! Page accumulation state for incrementally loaded collections
//!
//! [`PageState`] is the pure state machine behind infinite-scroll lists. It
//! never performs I/O: callers ask it for a [`PageRequest`], perform the fetch
//! however they like, and hand the outcome back through
//! [`PageState::complete`].
//!
//! Every request carries the generation it was issued under. Starting over
//! (new base URL or [`PageState::refetch`]) bumps the generation, so a response
//! that arrives for an abandoned generation is recognised and dropped.

use serde::Serialize;

pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_INITIAL_PAGE: u32 = 1;

/// Failure surfaced by a page fetch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// A single page fetch the caller should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub base_url: String,
    pub page: u32,
    pub url: String,
    pub generation: u64,
}

/// What [`PageState::complete`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// First page for the current base URL; previous items were discarded.
    Replaced(usize),
    /// Items were appended to the accumulated sequence.
    Appended(usize),
    /// The fetch failed; items are untouched and the cursor rolled back.
    Failed,
    /// The response belonged to an abandoned generation and was ignored.
    Stale,
}

/// Build `<base><sep><param>=<page>`, where `sep` is `&` when the base already
/// carries a query string.
pub fn page_url(base_url: &str, page_param: &str, page: u32) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}{page_param}={page}")
}

/// Accumulated items of a paginated collection
#[derive(Debug, Clone)]
pub struct PageState<T> {
    items: Vec<T>,
    base_url: String,
    committed_base: Option<String>,
    page_param: String,
    initial_page: u32,
    page: u32,
    /// Page the next `begin_next_page` requests.
    next_page: u32,
    loaded_page: Option<u32>,
    loading: bool,
    error: Option<String>,
    has_more: bool,
    generation: u64,
}

/// Read-only copy of a [`PageState`] for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub is_loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_PARAM, DEFAULT_INITIAL_PAGE)
    }
}

impl<T> PageState<T> {
    pub fn new(page_param: &str, initial_page: u32) -> Self {
        let initial_page = initial_page.max(1);
        Self {
            items: Vec::new(),
            base_url: String::new(),
            committed_base: None,
            page_param: page_param.to_string(),
            initial_page,
            page: initial_page,
            next_page: initial_page,
            loaded_page: None,
            loading: false,
            error: None,
            has_more: false,
            generation: 0,
        }
    }

    fn request(&self) -> PageRequest {
        PageRequest {
            base_url: self.base_url.clone(),
            page: self.page,
            url: page_url(&self.base_url, &self.page_param, self.page),
            generation: self.generation,
        }
    }

    /// Point the state at `base_url` and issue its first page.
    ///
    /// Accumulated items are discarded and any fetch still in flight becomes
    /// stale.
    pub fn start(&mut self, base_url: &str) -> PageRequest {
        self.items.clear();
        self.committed_base = None;
        self.base_url = base_url.to_string();
        self.page = self.initial_page;
        self.next_page = self.initial_page;
        self.loaded_page = None;
        self.error = None;
        self.has_more = true;
        self.generation += 1;
        self.loading = true;
        self.request()
    }

    /// Clear everything and issue the initial page again.
    pub fn refetch(&mut self) -> PageRequest {
        let base_url = self.base_url.clone();
        self.start(&base_url)
    }

    /// Advance the cursor and issue the next page, unless a fetch is already in
    /// flight.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if self.loading {
            return None;
        }
        self.page = self.next_page;
        self.loading = true;
        self.error = None;
        Some(self.request())
    }

    /// Apply the outcome of `request`.
    pub fn complete(&mut self, request: &PageRequest, result: Result<Vec<T>, FetchError>) -> Completion {
        if request.generation != self.generation {
            return Completion::Stale;
        }
        self.loading = false;

        match result {
            Ok(items) => {
                let count = items.len();
                self.has_more = count > 0;
                self.loaded_page = Some(request.page);
                self.next_page = request.page + 1;
                if self.committed_base.as_deref() != Some(request.base_url.as_str()) {
                    self.items = items;
                    self.committed_base = Some(request.base_url.clone());
                    Completion::Replaced(count)
                } else {
                    self.items.extend(items);
                    Completion::Appended(count)
                }
            }
            Err(err) => {
                self.error = Some(err.to_string());
                // The next call re-requests the failed page.
                self.next_page = request.page;
                self.page = self.loaded_page.unwrap_or(self.initial_page);
                Completion::Failed
            }
        }
    }

    /// Forget everything, including the base URL. In-flight fetches become
    /// stale.
    pub fn reset(&mut self) {
        self.items.clear();
        self.committed_base = None;
        self.page = self.initial_page;
        self.next_page = self.initial_page;
        self.loaded_page = None;
        self.loading = false;
        self.error = None;
        self.has_more = false;
        self.generation += 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T: Clone> PageState<T> {
    pub fn snapshot(&self) -> PageSnapshot<T> {
        PageSnapshot {
            items: self.items.clone(),
            current_page: self.page,
            is_loading: self.loading,
            error: self.error.clone(),
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U1: &str = "https://api/programs";
    const U2: &str = "https://api/programs?filter[country]=Spain";

    fn ok(items: &[&'static str]) -> Result<Vec<&'static str>, FetchError> {
        Ok(items.to_vec())
    }

    #[test]
    fn test_page_url_separator() {
        assert_eq!(page_url(U1, "page", 1), "https://api/programs?page=1");
        assert_eq!(
            page_url(U2, "page", 3),
            "https://api/programs?filter[country]=Spain&page=3"
        );
        assert_eq!(page_url(U1, "p", 2), "https://api/programs?p=2");
    }

    #[test]
    fn test_accumulates_pages_in_order() {
        let mut state = PageState::default();

        let first = state.start(U1);
        assert_eq!(first.url, "https://api/programs?page=1");
        assert_eq!(state.complete(&first, ok(&["A", "B"])), Completion::Replaced(2));

        let second = state.begin_next_page().unwrap();
        assert_eq!(second.page, 2);
        assert_eq!(state.complete(&second, ok(&["C", "D"])), Completion::Appended(2));

        assert_eq!(state.items(), &["A", "B", "C", "D"]);
        assert_eq!(state.current_page(), 2);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_next_page_is_noop_while_loading() {
        let mut state = PageState::<&str>::default();
        let first = state.start(U1);

        assert!(state.begin_next_page().is_none());
        assert!(state.begin_next_page().is_none());
        assert_eq!(state.current_page(), 1);

        state.complete(&first, ok(&["A"]));
        let next = state.begin_next_page().unwrap();
        assert_eq!(next.page, 2);
        assert!(state.begin_next_page().is_none());
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_new_base_url_replaces_and_drops_stale_response() {
        let mut state = PageState::default();
        let first = state.start(U1);
        state.complete(&first, ok(&["A", "B"]));
        let stale = state.begin_next_page().unwrap();

        let fresh = state.start(U2);
        assert_eq!(fresh.page, 1);

        assert!(state.items().is_empty());

        assert_eq!(state.complete(&stale, ok(&["X", "Y"])), Completion::Stale);
        assert!(state.items().is_empty());
        assert!(state.is_loading());

        assert_eq!(state.complete(&fresh, ok(&["C"])), Completion::Replaced(1));
        assert_eq!(state.items(), &["C"]);
    }

    #[test]
    fn test_stale_response_after_fresh_one_is_ignored() {
        let mut state = PageState::default();
        let old = state.start(U1);
        let fresh = state.start(U2);

        state.complete(&fresh, ok(&["C"]));
        assert_eq!(state.complete(&old, ok(&["A"])), Completion::Stale);
        assert_eq!(state.items(), &["C"]);
    }

    #[test]
    fn test_failure_keeps_items_and_rolls_back_cursor() {
        let mut state = PageState::default();
        let first = state.start(U1);
        state.complete(&first, ok(&["A"]));

        let second = state.begin_next_page().unwrap();
        assert_eq!(
            state.complete(&second, Err(FetchError::Status(500))),
            Completion::Failed
        );
        assert_eq!(state.items(), &["A"]);
        assert_eq!(state.error(), Some("HTTP error! status: 500"));
        assert_eq!(state.current_page(), 1);

        let retry = state.begin_next_page().unwrap();
        assert_eq!(retry.page, 2);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_failed_first_page_retries_first_page() {
        let mut state = PageState::<&str>::default();
        let first = state.start(U1);
        state.complete(&first, Err(FetchError::Transport("connection refused".into())));

        assert_eq!(state.error(), Some("connection refused"));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.snapshot().current_page, 1);

        let retry = state.begin_next_page().unwrap();
        assert_eq!(retry.page, 1);
        assert_eq!(state.complete(&retry, ok(&["A"])), Completion::Replaced(1));
        assert_eq!(state.begin_next_page().map(|r| r.page), Some(2));
    }

    #[test]
    fn test_refetch_resets() {
        let mut state = PageState::default();
        let first = state.start(U1);
        state.complete(&first, ok(&["A"]));
        let second = state.begin_next_page().unwrap();
        state.complete(&second, ok(&["B"]));

        let again = state.refetch();

        assert!(state.items().is_empty());
        assert_eq!(again.page, 1);
        assert_eq!(again.base_url, U1);
        assert_eq!(state.complete(&again, ok(&["A2"])), Completion::Replaced(1));
        assert_eq!(state.items(), &["A2"]);
    }

    #[test]
    fn test_has_more_follows_last_page() {
        let mut state = PageState::default();
        let first = state.start(U1);
        state.complete(&first, ok(&["A"]));
        assert!(state.has_more());

        let second = state.begin_next_page().unwrap();
        state.complete(&second, ok(&[]));
        assert!(!state.has_more());
    }

    #[test]
    fn test_start_resets_has_more() {
        let mut state = PageState::default();
        let first = state.start(U1);
        state.complete(&first, ok(&["A"]));
        let second = state.begin_next_page().unwrap();
        state.complete(&second, ok(&[]));
        assert!(!state.snapshot().has_more);

        state.start(U2);

        let snapshot = state.snapshot();
        assert!(snapshot.has_more);
        assert_eq!(snapshot.current_page, 1);
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn test_custom_initial_page_failure_keeps_cursor_positive() {
        let mut state = PageState::<&str>::new("p", 3);
        let first = state.start(U1);
        state.complete(&first, Err(FetchError::Status(502)));

        assert_eq!(state.current_page(), 3);
        assert_eq!(state.begin_next_page().map(|r| r.page), Some(3));
    }

    #[test]
    fn test_custom_initial_page_and_param() {
        let mut state = PageState::<&str>::new("p", 3);
        let first = state.start(U2);
        assert_eq!(first.url, "https://api/programs?filter[country]=Spain&p=3");
    }

    #[test]
    fn test_reset_makes_in_flight_stale() {
        let mut state = PageState::default();
        let first = state.start(U1);
        state.reset();

        assert_eq!(state.complete(&first, ok(&["A"])), Completion::Stale);
        assert!(state.items().is_empty());
        assert!(!state.is_loading());
    }
}
