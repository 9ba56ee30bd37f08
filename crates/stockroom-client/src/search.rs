//! # Search-and-Sync Pipeline
//!
//! Debounces keystroke-driven query changes, issues one fetch per quiet
//! window, and reconciles completions into the visible item list while
//! discarding superseded responses.
//!
//! ## Pipeline States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Search Pipeline State Machine                       │
//! │                                                                         │
//! │            set_query                  window elapses                    │
//! │   Idle ──────────────► Debouncing ──────────────────► InFlight         │
//! │    ▲                       │   ▲                          │             │
//! │    │                       └───┘                          │             │
//! │    │                    set_query                         │             │
//! │    │                 (window rearmed;                     │             │
//! │    │                  old one never fires)                │             │
//! │    │                                                      │             │
//! │    └──────────────── newest completion applied ◄──────────┘             │
//! │                      (stale completions discarded                       │
//! │                       silently, list untouched)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Supersession
//! Each issued fetch carries a generation number. A completion is applied
//! only when its generation is still the newest one issued; anything older
//! is dropped without touching the list and without surfacing an error.
//! Superseded requests are not aborted at the transport level - their
//! responses are simply ignored on arrival.
//!
//! ## Failure Policy
//! A failed fetch leaves the previous list visible and reports the error to
//! the listener. The empty-on-failure alternative was rejected: blanking a
//! list the user was just reading is worse than showing slightly stale data
//! next to an error notice.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::config::DEFAULT_DEBOUNCE;
use crate::error::{ClientError, ClientResult};
use crate::list::ItemList;
use stockroom_core::Item;

// =============================================================================
// Seams
// =============================================================================

/// Anything the pipeline can fetch items from.
///
/// Implemented by the remote API client (server-side search) and the local
/// database source. An empty query means "match all".
#[async_trait::async_trait]
pub trait ItemSource: Send + Sync + 'static {
    async fn fetch(&self, query: &str) -> ClientResult<Vec<Item>>;
}

/// Observer for pipeline outcomes (implemented by the frontend layer).
pub trait SearchListener: Send + Sync + 'static {
    /// A fetch completed and its items now fill the list.
    fn on_results(&self, query: &str, items: &[Item]);

    /// A fetch failed; the previous list is still visible.
    fn on_error(&self, query: &str, error: &ClientError);
}

/// No-op listener for callers that only poll the list.
pub struct NoOpListener;

impl SearchListener for NoOpListener {
    fn on_results(&self, _query: &str, _items: &[Item]) {}
    fn on_error(&self, _query: &str, _error: &ClientError) {}
}

// =============================================================================
// State & Config
// =============================================================================

/// Externally observable pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No query pending, no fetch running.
    Idle,
    /// A query is waiting out its debounce window.
    Debouncing,
    /// A fetch has been issued and not yet resolved.
    InFlight,
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet window required before a query triggers a fetch.
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// A completed fetch, tagged with the generation that issued it.
struct FetchDone {
    generation: u64,
    query: String,
    result: ClientResult<Vec<Item>>,
}

/// Spawns and owns the search worker task.
pub struct SearchPipeline;

impl SearchPipeline {
    /// Spawns a pipeline over `source` with no listener.
    pub fn spawn<S: ItemSource>(source: Arc<S>, config: SearchConfig) -> SearchHandle {
        Self::spawn_with_listener(source, Arc::new(NoOpListener), config)
    }

    /// Spawns a pipeline over `source`, reporting outcomes to `listener`.
    pub fn spawn_with_listener<S: ItemSource>(
        source: Arc<S>,
        listener: Arc<dyn SearchListener>,
        config: SearchConfig,
    ) -> SearchHandle {
        let (query_tx, query_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let (state_tx, state_rx) = watch::channel(SearchState::Idle);
        let list = ItemList::new();

        tokio::spawn(run(
            source,
            listener,
            list.clone(),
            state_tx,
            query_rx,
            shutdown_rx,
            config.debounce,
        ));

        SearchHandle {
            query_tx,
            shutdown_tx,
            state_rx,
            list,
        }
    }
}

/// Handle for feeding queries into a running pipeline.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    query_tx: mpsc::UnboundedSender<String>,
    shutdown_tx: mpsc::Sender<()>,
    state_rx: watch::Receiver<SearchState>,
    list: ItemList,
}

impl SearchHandle {
    /// Feeds a text-change event into the pipeline.
    ///
    /// Cancels the pending debounce window (if any) and starts a new one for
    /// this text. Empty text is valid and means "show everything".
    pub fn set_query(&self, text: &str) {
        if self.query_tx.send(text.trim().to_string()).is_err() {
            warn!("Search pipeline is gone; query dropped");
        }
    }

    /// Returns the current pipeline state.
    pub fn state(&self) -> SearchState {
        *self.state_rx.borrow()
    }

    /// Returns a handle to the visible item list this pipeline maintains.
    pub fn list(&self) -> ItemList {
        self.list.clone()
    }

    /// Stops the worker. In-flight fetches resolve into nothing.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

// =============================================================================
// Worker
// =============================================================================

/// Worker loop: debounce inputs, issue generation-tagged fetches, reconcile
/// completions.
///
/// All list mutation happens here, on one task, so completions can never race
/// each other.
async fn run<S: ItemSource>(
    source: Arc<S>,
    listener: Arc<dyn SearchListener>,
    list: ItemList,
    state_tx: watch::Sender<SearchState>,
    mut query_rx: mpsc::UnboundedReceiver<String>,
    mut shutdown_rx: mpsc::Receiver<()>,
    debounce: Duration,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FetchDone>();

    // The debounce window. Starts elapsed and disabled; every query rearms it.
    let window = time::sleep(Duration::ZERO);
    tokio::pin!(window);

    // Query waiting out the current window.
    let mut pending: Option<String> = None;

    // Newest generation issued; completions older than this are stale.
    let mut latest_generation: u64 = 0;

    debug!(debounce_ms = debounce.as_millis() as u64, "Search pipeline started");

    loop {
        tokio::select! {
            // Queued inputs must win over a concurrently elapsing window, so
            // that a burst of keystrokes coalesces into one fetch.
            biased;

            _ = shutdown_rx.recv() => {
                debug!("Search pipeline received shutdown");
                break;
            }

            maybe_query = query_rx.recv() => {
                let Some(query) = maybe_query else { break };

                // Rearm the window. The previous deadline is gone; a canceled
                // window cannot fire for the old text.
                pending = Some(query);
                window.as_mut().reset(Instant::now() + debounce);
                let _ = state_tx.send(SearchState::Debouncing);
            }

            () = window.as_mut(), if pending.is_some() => {
                if let Some(query) = pending.take() {
                    latest_generation += 1;
                    let generation = latest_generation;
                    let _ = state_tx.send(SearchState::InFlight);

                    debug!(query = %query, generation, "Issuing fetch");

                    let source = source.clone();
                    let done_tx = done_tx.clone();
                    tokio::spawn(async move {
                        let result = source.fetch(&query).await;
                        let _ = done_tx.send(FetchDone { generation, query, result });
                    });
                }
            }

            Some(done) = done_rx.recv() => {
                if done.generation != latest_generation {
                    // A newer fetch owns the list now.
                    debug!(
                        query = %done.query,
                        generation = done.generation,
                        latest = latest_generation,
                        "Discarding superseded response"
                    );
                    continue;
                }

                match done.result {
                    Ok(items) => {
                        debug!(query = %done.query, count = items.len(), "Applying fetch result");
                        list.replace(items.clone()).await;
                        listener.on_results(&done.query, &items);
                    }
                    Err(err) => {
                        // Previous list stays visible.
                        warn!(query = %done.query, error = %err, "Fetch failed");
                        listener.on_error(&done.query, &err);
                    }
                }

                if pending.is_none() {
                    let _ = state_tx.send(SearchState::Idle);
                }
            }
        }
    }

    debug!("Search pipeline stopped");
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Scripted item source: records every fetch, with optional per-query
    /// latency and failure.
    struct MockSource {
        calls: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
        failures: HashSet<String>,
    }

    impl MockSource {
        fn new() -> Self {
            MockSource {
                calls: Mutex::new(Vec::new()),
                delays: HashMap::new(),
                failures: HashSet::new(),
            }
        }

        fn with_delay(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }

        fn with_failure(mut self, query: &str) -> Self {
            self.failures.insert(query.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ItemSource for MockSource {
        async fn fetch(&self, query: &str) -> ClientResult<Vec<Item>> {
            self.calls.lock().unwrap().push(query.to_string());

            if let Some(delay) = self.delays.get(query) {
                time::sleep(*delay).await;
            }

            if self.failures.contains(query) {
                return Err(ClientError::Transport("connection refused".into()));
            }

            Ok(vec![Item::with_id(
                query.len() as i64,
                format!("result for '{query}'"),
                1,
            )])
        }
    }

    /// Listener that forwards outcomes into channels the test can await.
    struct TestListener {
        results_tx: mpsc::UnboundedSender<String>,
        errors_tx: mpsc::UnboundedSender<String>,
    }

    impl SearchListener for TestListener {
        fn on_results(&self, query: &str, _items: &[Item]) {
            let _ = self.results_tx.send(query.to_string());
        }

        fn on_error(&self, query: &str, _error: &ClientError) {
            let _ = self.errors_tx.send(query.to_string());
        }
    }

    fn listener() -> (
        Arc<TestListener>,
        mpsc::UnboundedReceiver<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        (
            Arc::new(TestListener {
                results_tx,
                errors_tx,
            }),
            results_rx,
            errors_rx,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_queries_coalesce_into_one_fetch() {
        let source = Arc::new(MockSource::new());
        let (listener, mut results_rx, _errors_rx) = listener();
        let handle = SearchPipeline::spawn_with_listener(
            source.clone(),
            listener,
            SearchConfig::default(),
        );

        // Faster than the debounce window
        handle.set_query("a");
        handle.set_query("ab");
        handle.set_query("abc");

        let applied = results_rx.recv().await.unwrap();
        assert_eq!(applied, "abc");

        // Exactly one fetch was issued, for the latest text
        assert_eq!(source.calls(), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_queries_each_fetch() {
        let source = Arc::new(MockSource::new());
        let (listener, mut results_rx, _errors_rx) = listener();
        let handle = SearchPipeline::spawn_with_listener(
            source.clone(),
            listener,
            SearchConfig::default(),
        );

        handle.set_query("a");
        assert_eq!(results_rx.recv().await.unwrap(), "a");

        handle.set_query("ab");
        assert_eq!(results_rx.recv().await.unwrap(), "ab");

        assert_eq!(source.calls(), vec!["a", "ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_never_overwrites_newer_result() {
        let source = Arc::new(
            MockSource::new()
                .with_delay("slow", Duration::from_millis(500))
                .with_delay("fast", Duration::from_millis(10)),
        );
        let (listener, mut results_rx, _errors_rx) = listener();
        let handle = SearchPipeline::spawn_with_listener(
            source.clone(),
            listener,
            SearchConfig::default(),
        );

        // First query goes in flight, then a newer one supersedes it while
        // the slow response is still pending.
        handle.set_query("slow");
        time::sleep(Duration::from_millis(310)).await; // window fired, "slow" in flight
        handle.set_query("fast");

        // The fast fetch completes and is applied
        assert_eq!(results_rx.recv().await.unwrap(), "fast");
        let fast_items = handle.list().items().await;
        assert_eq!(fast_items[0].name, "result for 'fast'");

        // Let the slow response arrive; it must be discarded silently
        time::sleep(Duration::from_millis(600)).await;
        assert!(results_rx.try_recv().is_err());
        assert_eq!(handle.list().items().await, fast_items);

        assert_eq!(source.calls(), vec!["slow", "fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_retains_previous_list() {
        let source = Arc::new(MockSource::new().with_failure("bad"));
        let (listener, mut results_rx, mut errors_rx) = listener();
        let handle = SearchPipeline::spawn_with_listener(
            source.clone(),
            listener,
            SearchConfig::default(),
        );

        handle.set_query("good");
        assert_eq!(results_rx.recv().await.unwrap(), "good");
        let before = handle.list().items().await;
        assert!(!before.is_empty());

        handle.set_query("bad");
        assert_eq!(errors_rx.recv().await.unwrap(), "bad");

        // The failed fetch left the previous result visible
        assert_eq!(handle.list().items().await, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_fetches_match_all() {
        let source = Arc::new(MockSource::new());
        let (listener, mut results_rx, _errors_rx) = listener();
        let handle = SearchPipeline::spawn_with_listener(
            source.clone(),
            listener,
            SearchConfig::default(),
        );

        handle.set_query("");
        assert_eq!(results_rx.recv().await.unwrap(), "");
        assert_eq!(source.calls(), vec![""]);
        assert_eq!(handle.state(), SearchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_query_trims_input() {
        let source = Arc::new(MockSource::new());
        let (listener, mut results_rx, _errors_rx) = listener();
        let handle = SearchPipeline::spawn_with_listener(
            source.clone(),
            listener,
            SearchConfig::default(),
        );

        handle.set_query("  laptop  ");
        assert_eq!(results_rx.recv().await.unwrap(), "laptop");
        assert_eq!(source.calls(), vec!["laptop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_worker() {
        let source = Arc::new(MockSource::new());
        let handle = SearchPipeline::spawn(source.clone(), SearchConfig::default());

        handle.shutdown().await;
        time::sleep(Duration::from_millis(10)).await;

        // Queries after shutdown are dropped, never fetched
        handle.set_query("late");
        time::sleep(Duration::from_secs(1)).await;
        assert!(source.calls().is_empty());
    }
}
