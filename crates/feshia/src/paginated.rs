//! Incremental fetch-on-demand for paginated collections
//!
//! [`PaginatedFetcher`] drives a [`PageState`] against a [`PageSource`]. The
//! state lock is only taken to issue or complete a request and is never held
//! across the network call, so a second `load_next_page` issued while one is
//! in flight sees the loading flag and returns immediately.

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;
use serde_json::Value;

use crate::http::PageSource;
use feshia_core::envelope::normalize;
use feshia_core::pagination::{Completion, PageRequest, PageSnapshot, PageState};

/// Turns the normalized item array of one page into cards.
pub type Serializer<T> = fn(Vec<Value>) -> Vec<T>;

pub struct PaginatedFetcher<T> {
    source: Arc<dyn PageSource>,
    serializer: Serializer<T>,
    state: Arc<Mutex<PageState<T>>>,
}

impl<T> Clone for PaginatedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            serializer: self.serializer,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> PaginatedFetcher<T> {
    pub fn new(source: Arc<dyn PageSource>, serializer: Serializer<T>) -> Self {
        Self::with_page_param(
            source,
            serializer,
            feshia_core::pagination::DEFAULT_PAGE_PARAM,
            feshia_core::pagination::DEFAULT_INITIAL_PAGE,
        )
    }

    pub fn with_page_param(
        source: Arc<dyn PageSource>,
        serializer: Serializer<T>,
        page_param: &str,
        initial_page: u32,
    ) -> Self {
        Self {
            source,
            serializer,
            state: Arc::new(Mutex::new(PageState::new(page_param, initial_page))),
        }
    }

    /// Switch to `base_url` and fetch its first page. Results of fetches issued
    /// for an earlier base URL are dropped when they arrive.
    pub async fn start(&self, base_url: &str) -> Completion {
        let request = self.state.lock().start(base_url);
        self.execute(request).await
    }

    /// Fetch the next page and append it. Returns `None` without fetching when
    /// a fetch is already in flight.
    pub async fn load_next_page(&self) -> Option<Completion> {
        let request = self.state.lock().begin_next_page();
        match request {
            Some(request) => Some(self.execute(request).await),
            None => {
                debug!("Skipping next page: a fetch is already in flight");
                None
            }
        }
    }

    /// Drop accumulated items and fetch the initial page again.
    pub async fn refetch(&self) -> Completion {
        let request = self.state.lock().refetch();
        self.execute(request).await
    }

    /// Fetch up to `pages` pages of `base_url`. Stops early once a page comes
    /// back empty or a fetch fails.
    pub async fn load_pages(&self, base_url: &str, pages: u32) -> PageSnapshot<T> {
        let mut completion = self.start(base_url).await;
        for _ in 1..pages {
            if completion == Completion::Failed || !self.state.lock().has_more() {
                break;
            }
            match self.load_next_page().await {
                Some(next) => completion = next,
                None => break,
            }
        }
        self.snapshot()
    }

    /// Abandon everything. Fetches still in flight will be ignored.
    pub fn stop(&self) {
        self.state.lock().reset();
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        self.state.lock().snapshot()
    }

    async fn execute(&self, request: PageRequest) -> Completion {
        let result = self
            .source
            .fetch(&request.url)
            .await
            .map(|raw| (self.serializer)(normalize(raw)));

        if let Err(err) = &result {
            warn!("Error fetching data from {}: {}", request.url, err);
        }

        let completion = self.state.lock().complete(&request, result);
        if completion == Completion::Stale {
            warn!("Dropped stale response for {}", request.url);
        }
        completion
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::http::testing::FakeSource;
    use feshia_core::pagination::FetchError;
    use serde_json::json;

    const U1: &str = "https://api/universities";
    const U2: &str = "https://api/universities?filter[name]=lund";

    fn slugs(items: Vec<Value>) -> Vec<String> {
        items
            .into_iter()
            .filter_map(|v| v["slug"].as_str().map(String::from))
            .collect()
    }

    fn page(slugs: &[&str]) -> Value {
        json!({"data": slugs.iter().map(|s| json!({"slug": s})).collect::<Vec<_>>()})
    }

    #[tokio::test]
    async fn test_accumulates_pages() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A", "B"]))
                .respond(&format!("{U1}?page=2"), json!([{"slug": "C"}, {"slug": "D"}])),
        );
        let fetcher = PaginatedFetcher::new(source.clone(), slugs);

        assert_eq!(fetcher.start(U1).await, Completion::Replaced(2));
        assert_eq!(fetcher.load_next_page().await, Some(Completion::Appended(2)));

        let snapshot = fetcher.snapshot();
        assert_eq!(snapshot.items, vec!["A", "B", "C", "D"]);
        assert_eq!(snapshot.current_page, 2);
        assert!(!snapshot.is_loading);
        assert_eq!(
            source.calls(),
            vec![format!("{U1}?page=1"), format!("{U1}?page=2")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_load_while_loading_is_dropped() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A"]))
                .respond_after(
                    &format!("{U1}?page=2"),
                    Duration::from_millis(50),
                    page(&["B"]),
                ),
        );
        let fetcher = PaginatedFetcher::new(source.clone(), slugs);
        fetcher.start(U1).await;

        let (first, second) = tokio::join!(fetcher.load_next_page(), fetcher.load_next_page());

        assert_eq!(first, Some(Completion::Appended(1)));
        assert_eq!(second, None);
        assert_eq!(fetcher.snapshot().current_page, 2);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_base_url_response_is_discarded() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A", "B"]))
                .respond_after(
                    &format!("{U1}?page=2"),
                    Duration::from_millis(100),
                    page(&["stale"]),
                )
                .respond_after(&format!("{U2}&page=1"), Duration::from_millis(10), page(&["L"])),
        );
        let fetcher = PaginatedFetcher::new(source.clone(), slugs);
        fetcher.start(U1).await;

        let (old, new) = tokio::join!(fetcher.load_next_page(), fetcher.start(U2));

        assert_eq!(old, Some(Completion::Stale));
        assert_eq!(new, Completion::Replaced(1));
        assert_eq!(fetcher.snapshot().items, vec!["L"]);
    }

    #[tokio::test]
    async fn test_error_state_keeps_data() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A"]))
                .fail(&format!("{U1}?page=2"), FetchError::Status(503)),
        );
        let fetcher = PaginatedFetcher::new(source, slugs);
        fetcher.start(U1).await;

        assert_eq!(fetcher.load_next_page().await, Some(Completion::Failed));

        let snapshot = fetcher.snapshot();
        assert_eq!(snapshot.items, vec!["A"]);
        assert_eq!(snapshot.error.as_deref(), Some("HTTP error! status: 503"));
        assert_eq!(snapshot.current_page, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_envelope_is_empty_not_error() {
        let source = Arc::new(
            FakeSource::new().respond(&format!("{U1}?page=1"), json!({"results": [1, 2]})),
        );
        let fetcher = PaginatedFetcher::new(source, slugs);

        assert_eq!(fetcher.start(U1).await, Completion::Replaced(0));
        let snapshot = fetcher.snapshot();
        assert!(snapshot.items.is_empty());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.has_more);
    }

    #[tokio::test]
    async fn test_refetch_starts_over() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A"]))
                .respond(&format!("{U1}?page=2"), page(&["B"])),
        );
        let fetcher = PaginatedFetcher::new(source.clone(), slugs);
        fetcher.start(U1).await;
        fetcher.load_next_page().await;

        assert_eq!(fetcher.refetch().await, Completion::Replaced(1));
        assert_eq!(fetcher.snapshot().items, vec!["A"]);
        assert_eq!(source.calls().last().map(String::as_str), Some("https://api/universities?page=1"));
    }

    #[tokio::test]
    async fn test_custom_page_param() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U2}&p=3"), page(&["Z"]))
                .respond(&format!("{U2}&p=4"), page(&["Y"])),
        );
        let fetcher = PaginatedFetcher::with_page_param(source, slugs, "p", 3);

        assert_eq!(fetcher.start(U2).await, Completion::Replaced(1));
        assert_eq!(fetcher.load_next_page().await, Some(Completion::Appended(1)));
        assert_eq!(fetcher.snapshot().items, vec!["Z", "Y"]);
    }

    #[tokio::test]
    async fn test_load_pages_stops_at_empty_page() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A"]))
                .respond(&format!("{U1}?page=2"), page(&[]))
                .respond(&format!("{U1}?page=3"), page(&["never"])),
        );
        let fetcher = PaginatedFetcher::new(source.clone(), slugs);

        let snapshot = fetcher.load_pages(U1, 5).await;

        assert_eq!(snapshot.items, vec!["A"]);
        assert!(!snapshot.has_more);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_load_pages_stops_on_error() {
        let source = Arc::new(
            FakeSource::new()
                .respond(&format!("{U1}?page=1"), page(&["A"]))
                .fail(&format!("{U1}?page=2"), FetchError::Transport("reset".into())),
        );
        let fetcher = PaginatedFetcher::new(source.clone(), slugs);

        let snapshot = fetcher.load_pages(U1, 4).await;

        assert_eq!(snapshot.items, vec!["A"]);
        assert_eq!(snapshot.error.as_deref(), Some("reset"));
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight() {
        let source = Arc::new(FakeSource::new().respond_after(
            &format!("{U1}?page=1"),
            Duration::from_millis(20),
            page(&["A"]),
        ));
        let fetcher = PaginatedFetcher::new(source, slugs);
        let background = fetcher.clone();

        let handle = tokio::spawn(async move { background.start(U1).await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        fetcher.stop();

        assert_eq!(handle.await.unwrap(), Completion::Stale);
        assert!(fetcher.snapshot().items.is_empty());
    }
}
