//! Debounced search-as-you-type
//!
//! A [`Debouncer`] owns at most one pending task. Scheduling a new one aborts
//! the previous task, whether it is still waiting out its quiet period or
//! already fetching. Every input is tagged with a sequence number, and results
//! are only committed when their sequence is still the latest.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::warn;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::http::PageSource;
use feshia_core::envelope::normalize;
use feshia_core::university::{universities_from_values, university_search_url, UniversityCard};

/// Quiet period between the last keystroke and the search request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Single pending delayed task
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing whatever was pending.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the pending task, if any, to run to completion.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    warn!("Debounced task failed: {err}");
                }
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// What the search dropdown shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub term: String,
    pub results: Vec<UniversityCard>,
    pub is_searching: bool,
    pub show_dropdown: bool,
    pub error: Option<String>,
    /// Sequence number of the input the results belong to.
    pub committed: u64,
}

/// University name search with debounce and latest-wins commits
pub struct SearchController {
    source: Arc<dyn PageSource>,
    api_base: String,
    delay: Duration,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<SearchState>>,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(source: Arc<dyn PageSource>, api_base: &str, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            source,
            api_base: api_base.to_string(),
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            debouncer: Debouncer::new(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Handle a change of the search box text.
    pub fn input(&mut self, text: &str) {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.term = text.to_string());

        let query = text.trim().to_string();
        if query.is_empty() {
            self.debouncer.cancel();
            self.state.send_modify(|s| {
                s.results.clear();
                s.show_dropdown = false;
                s.is_searching = false;
                s.error = None;
                s.committed = seq;
            });
            return;
        }

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        let state = Arc::clone(&self.state);
        let url = university_search_url(&self.api_base, &query);

        self.debouncer.schedule(self.delay, async move {
            state.send_modify(|s| s.is_searching = true);

            let result = source
                .fetch(&url)
                .await
                .map(|raw| universities_from_values(normalize(raw)));

            if latest.load(Ordering::SeqCst) != seq {
                warn!("Dropping stale search results for '{query}'");
                return;
            }

            state.send_modify(|s| {
                s.is_searching = false;
                s.committed = seq;
                match result {
                    Ok(results) => {
                        s.results = results;
                        s.show_dropdown = true;
                        s.error = None;
                    }
                    Err(err) => {
                        warn!("Error searching universities: {err}");
                        s.results.clear();
                        s.error = Some(err.to_string());
                    }
                }
            });
        });
    }

    /// Hide the dropdown without touching the results.
    pub fn blur(&self) {
        self.state.send_modify(|s| s.show_dropdown = false);
    }

    /// Show the dropdown again if there is something to show.
    pub fn focus(&self) {
        self.state
            .send_modify(|s| s.show_dropdown = !s.results.is_empty());
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Wait until the pending search, if any, has been committed or dropped.
    pub async fn settle(&mut self) {
        self.debouncer.flush().await;
    }
}
