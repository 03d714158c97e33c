// Debounced player search.
//
// Each `schedule` call aborts the pending search (if any) and spawns a new one
// that waits out the debounce window before running. Results are tagged with
// the generation that produced them so a consumer can discard anything older
// than the latest schedule.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::players::{self, Player};

/// Capacity of the results channel.
const RESULTS_BUFFER: usize = 16;

/// Outcome of one debounced search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub generation: u64,
    pub query: String,
    pub players: Vec<Player>,
}

/// Cancellable search timer owned by its caller.
///
/// Must be used from within a tokio runtime. Dropping the debouncer aborts
/// any pending search.
pub struct SearchDebouncer {
    catalog: Arc<Vec<Player>>,
    delay: Duration,
    min_query_len: usize,
    tx: mpsc::Sender<SearchResults>,
    pending: Option<JoinHandle<()>>,
    /// Incremented on every schedule; results from older generations are
    /// stale.
    generation: u64,
}

impl SearchDebouncer {
    pub fn new(
        catalog: Arc<Vec<Player>>,
        delay: Duration,
        min_query_len: usize,
    ) -> (Self, mpsc::Receiver<SearchResults>) {
        let (tx, rx) = mpsc::channel(RESULTS_BUFFER);
        let debouncer = SearchDebouncer {
            catalog,
            delay,
            min_query_len,
            tx,
            pending: None,
            generation: 0,
        };
        (debouncer, rx)
    }

    /// Replace any pending search with one for `query`. Returns the
    /// generation its results will carry.
    pub fn schedule(&mut self, query: impl Into<String>) -> u64 {
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        let query = query.into();
        let catalog = Arc::clone(&self.catalog);
        let delay = self.delay;
        let min_query_len = self.min_query_len;
        let tx = self.tx.clone();

        debug!("Scheduled search {:?} (gen: {})", query, generation);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let matches = players::search(&catalog, &query, min_query_len)
                .into_iter()
                .cloned()
                .collect();
            let results = SearchResults {
                generation,
                query,
                players: matches,
            };
            if tx.send(results).await.is_err() {
                debug!("Search results receiver dropped (gen: {})", generation);
            }
        }));

        generation
    }

    /// Abort the pending search, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!("Cancelled pending search (gen: {})", self.generation);
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when `results` came from the most recent schedule.
    pub fn is_current(&self, results: &SearchResults) -> bool {
        results.generation == self.generation
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
