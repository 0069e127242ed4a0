//! Single-result pipeline for point lookups.
//!
//! One invocation produces `Loading` followed by exactly one terminal state.
//! Re-invocation with a new id supersedes any in-flight request: stale
//! results are discarded, never delivered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cinefeed_core::{classify_lookup, ClassifiedError, DataState, Movie, MovieCatalog, MovieId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

// ============================================================================
// One-shot lookup
// ============================================================================

/// Fetches a single movie and wraps the outcome.
///
/// Success maps the transport record to the domain shape; failure goes
/// through the lookup classifier.
pub async fn lookup(catalog: &dyn MovieCatalog, id: MovieId) -> DataState<Movie> {
    debug!(id, "Looking up movie detail");
    match catalog.fetch_detail(id).await {
        Ok(record) => DataState::Success(Movie::from(record)),
        Err(err) => DataState::Error(classify_lookup(err)),
    }
}

// ============================================================================
// Detail State
// ============================================================================

/// Observable state of the detail pipeline.
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    /// A lookup is in flight.
    pub is_loading: bool,
    /// The most recently resolved movie, kept across reloads.
    pub movie: Option<Movie>,
    /// Classified failure of the most recent lookup, cleared on reload.
    pub error: Option<ClassifiedError>,
}

// ============================================================================
// Detail Pipeline
// ============================================================================

/// Drives point lookups with latest-wins semantics.
///
/// Each [`Self::load`] bumps a generation counter; a completing lookup
/// publishes its terminal state only while its generation is still current.
/// Observers therefore never see a result for a superseded id.
pub struct DetailPipeline {
    catalog: Arc<dyn MovieCatalog>,
    state_tx: watch::Sender<DetailState>,
    generation: Arc<AtomicU64>,
}

impl DetailPipeline {
    /// Creates an idle pipeline.
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        let (state_tx, _) = watch::channel(DetailState::default());
        Self {
            catalog,
            state_tx,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribes to pipeline state.
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state_tx.subscribe()
    }

    /// Returns the current state.
    pub fn state(&self) -> DetailState {
        self.state_tx.borrow().clone()
    }

    /// Requests the detail record for `id`, superseding any in-flight
    /// request.
    ///
    /// Publishes `Loading` immediately (the previous movie stays visible,
    /// the previous error is cleared) and spawns the fetch. The returned
    /// handle completes when the fetch settles, whether or not its result
    /// was still current.
    pub fn load(&self, id: MovieId) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let catalog = self.catalog.clone();
        let state_tx = self.state_tx.clone();
        let counter = self.generation.clone();

        tokio::spawn(async move {
            let result = lookup(catalog.as_ref(), id).await;

            // The currency check runs inside the channel lock so a stale
            // terminal can never slip in after a newer load's `Loading`.
            state_tx.send_if_modified(|state| {
                if counter.load(Ordering::SeqCst) != generation {
                    debug!(id, "Superseded detail result, discarding");
                    return false;
                }
                match result {
                    DataState::Success(movie) => {
                        *state = DetailState {
                            is_loading: false,
                            movie: Some(movie),
                            error: None,
                        };
                    }
                    DataState::Error(err) => {
                        state.is_loading = false;
                        state.error = Some(err);
                    }
                    DataState::Loading => unreachable!("lookup never yields Loading"),
                }
                true
            });
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
