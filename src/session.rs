//! Client-side search scheduling: debounce and last-write-wins.
//!
//! Every [`SearchSession::submit`] gets a generation number. A submission
//! waits out the debounce window; if a newer one arrived meanwhile it is
//! dropped without searching. Searches that do start are never blocked by,
//! and never block, later submissions. When a search finishes its outcome is
//! applied only if no outcome from a later generation has been applied, so a
//! slow stale response can never overwrite a fresh one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shelf_core::config::SessionConfig;
use shelf_core::{FacetFilterState, QueryMatch, SearchError};
use tokio::sync::watch;

use crate::service::SearchService;

/// Result of one applied search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub generation: u64,
    pub result: Result<Vec<QueryMatch>, SearchError>,
}

pub struct SearchSession {
    service: Arc<SearchService>,
    debounce: Duration,
    issued: Arc<AtomicU64>,
    applied: watch::Sender<Option<SearchOutcome>>,
}

impl SearchSession {
    pub fn new(service: Arc<SearchService>, config: &SessionConfig) -> Self {
        Self::with_debounce(service, Duration::from_millis(config.debounce_ms))
    }

    pub fn with_debounce(service: Arc<SearchService>, debounce: Duration) -> Self {
        let (applied, _) = watch::channel(None);
        Self {
            service,
            debounce,
            issued: Arc::new(AtomicU64::new(0)),
            applied,
        }
    }

    /// Schedule a search for `state` and return its generation. Must be
    /// called from within a tokio runtime.
    pub fn submit(&self, state: FacetFilterState) -> u64 {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let issued = Arc::clone(&self.issued);
        let service = Arc::clone(&self.service);
        let applied = self.applied.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if issued.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "superseded during debounce");
                return;
            }

            let result = service.search(&state).await;
            let outcome = SearchOutcome { generation, result };
            let accepted = applied.send_if_modified(|current| {
                if current.as_ref().is_some_and(|c| c.generation > generation) {
                    return false;
                }
                *current = Some(outcome);
                true
            });

            if accepted {
                tracing::debug!(generation, "applied search outcome");
            } else {
                tracing::debug!(generation, "discarded stale search outcome");
            }
        });

        generation
    }

    /// Most recently issued generation.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// The outcome currently on display, if any.
    pub fn latest(&self) -> Option<SearchOutcome> {
        self.applied.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SearchOutcome>> {
        self.applied.subscribe()
    }

    /// Wait for the next applied outcome.
    pub async fn changed(&self) -> Option<SearchOutcome> {
        let mut rx = self.applied.subscribe();
        while rx.changed().await.is_ok() {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return Some(outcome);
            }
        }
        None
    }
}
