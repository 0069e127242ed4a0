//! Incremental collection: an accumulated, duplicate-free movie list with
//! per-edge load state.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cinefeed_core::{Movie, MovieCatalog, MovieId, PageToken};
use tokio::sync::watch;
use tracing::debug;

use crate::source::{PageResult, PageSource};
use crate::state::{EdgeStates, LoadEdge, LoadState};

// ============================================================================
// Snapshot
// ============================================================================

/// One observable state of the collection: the accumulated list plus the
/// state of all three load edges.
#[derive(Debug, Clone, Default)]
pub struct PagedSnapshot {
    /// Accumulated domain movies, duplicate-free, in first-seen order.
    pub items: Vec<Movie>,
    /// Load state per edge.
    pub edges: EdgeStates,
}

// ============================================================================
// Collection State
// ============================================================================

/// Generation that set each edge's in-flight gate. Lets a discarded stale
/// completion tell its own gate from one a newer load has since acquired.
#[derive(Default)]
struct EdgeOwners {
    refresh: Option<u64>,
    prepend: Option<u64>,
    append: Option<u64>,
}

impl EdgeOwners {
    fn get_mut(&mut self, edge: LoadEdge) -> &mut Option<u64> {
        match edge {
            LoadEdge::Refresh => &mut self.refresh,
            LoadEdge::Prepend => &mut self.prepend,
            LoadEdge::Append => &mut self.append,
        }
    }
}

struct Inner {
    source: PageSource,
    /// Bumped on every restart; a completion whose generation is stale is
    /// discarded instead of merged.
    generation: u64,
    gate_owners: EdgeOwners,
    items: Vec<Movie>,
    seen: HashSet<MovieId>,
    next_token: Option<PageToken>,
    prev_token: Option<PageToken>,
    /// Neighbor tokens of the most recently loaded page, kept (with the
    /// items drained) for refresh-key resolution.
    last_page: Option<PageResult>,
    /// Token the current refresh started from, so a failed refresh retries
    /// the same page.
    refresh_token: Option<PageToken>,
    edges: EdgeStates,
}

/// Consumer-facing adapter that accumulates page loads into one growing,
/// de-duplicated ordered list.
///
/// Exposes per-edge load status, manual retry of a failed edge, and a full
/// restart when the anchor changes. At most one load per edge is in flight
/// at any time; a second request for a loading edge is dropped. A failure
/// on one edge never touches already-loaded items.
pub struct PagedCollection {
    catalog: Arc<dyn MovieCatalog>,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<PagedSnapshot>,
}

impl PagedCollection {
    /// Creates an empty collection scoped to the given anchor. No load is
    /// issued until [`Self::load_initial`].
    pub fn new(catalog: Arc<dyn MovieCatalog>, anchor: Option<MovieId>) -> Self {
        let source = PageSource::new(catalog.clone(), anchor);
        let (snapshot_tx, _) = watch::channel(PagedSnapshot::default());
        Self {
            catalog,
            inner: Mutex::new(Inner {
                source,
                generation: 0,
                gate_owners: EdgeOwners::default(),
                items: Vec::new(),
                seen: HashSet::new(),
                next_token: None,
                prev_token: None,
                last_page: None,
                refresh_token: None,
                edges: EdgeStates::default(),
            }),
            snapshot_tx,
        }
    }

    /// Subscribes to snapshots. Every state change publishes a new one.
    pub fn subscribe(&self) -> watch::Receiver<PagedSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> PagedSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// The anchor this collection is currently scoped to.
    pub fn anchor(&self) -> Option<MovieId> {
        self.lock().source.anchor()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Loads the first page, replacing the accumulated list on success.
    ///
    /// Dropped if a refresh is already in flight. Restarting abandons any
    /// in-flight prepend/append load: their results arrive with a stale
    /// generation and are discarded.
    pub async fn load_initial(&self) {
        self.run_refresh(None).await;
    }

    /// Restarts from the refresh key of the most recently loaded page,
    /// falling back to the first page.
    pub async fn refresh(&self) {
        let key = {
            let inner = self.lock();
            PageSource::refresh_key(inner.last_page.as_ref())
        };
        self.run_refresh(key).await;
    }

    /// Loads the page after the last loaded one and appends its unseen
    /// items.
    ///
    /// No-op while the append edge is loading, once the end is reached, or
    /// before a successful initial load.
    pub async fn load_append(&self) {
        let Some((generation, source, token)) = ({
            let mut inner = self.lock();
            if inner.edges.append.is_loading() || inner.edges.append.end_reached() {
                debug!("Append dropped: edge busy or exhausted");
                None
            } else if let Some(token) = inner.next_token {
                inner.edges.append = LoadState::Loading;
                inner.gate_owners.append = Some(inner.generation);
                self.publish(&inner);
                Some((inner.generation, inner.source.clone(), token))
            } else {
                // Nothing loaded yet; there is no edge to extend.
                None
            }
        }) else {
            return;
        };

        let result = source.load(Some(token)).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(token, "Stale append result, discarding");
            Self::release_stale_edge(&mut inner, LoadEdge::Append, generation);
            self.publish(&inner);
            return;
        }
        inner.gate_owners.append = None;
        match result {
            Ok(mut page) => {
                let records = std::mem::take(&mut page.items);
                let Inner { items, seen, .. } = &mut *inner;
                items.extend(
                    records
                        .into_iter()
                        .map(Movie::from)
                        .filter(|movie| seen.insert(movie.id)),
                );
                inner.next_token = page.next;
                inner.edges.append = LoadState::NotLoading {
                    end_reached: page.next.is_none(),
                };
                inner.last_page = Some(page);
            }
            Err(err) => {
                // Token not advanced: a retry re-fetches the same page and
                // dedup keeps the merge idempotent.
                inner.edges.append = LoadState::Error(err);
            }
        }
        self.publish(&inner);
    }

    /// Loads the page before the first loaded one and prepends its unseen
    /// items, preserving upstream order.
    ///
    /// Same gating rules as [`Self::load_append`].
    pub async fn load_prepend(&self) {
        let Some((generation, source, token)) = ({
            let mut inner = self.lock();
            if inner.edges.prepend.is_loading() || inner.edges.prepend.end_reached() {
                debug!("Prepend dropped: edge busy or exhausted");
                None
            } else if let Some(token) = inner.prev_token {
                inner.edges.prepend = LoadState::Loading;
                inner.gate_owners.prepend = Some(inner.generation);
                self.publish(&inner);
                Some((inner.generation, inner.source.clone(), token))
            } else {
                None
            }
        }) else {
            return;
        };

        let result = source.load(Some(token)).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(token, "Stale prepend result, discarding");
            Self::release_stale_edge(&mut inner, LoadEdge::Prepend, generation);
            self.publish(&inner);
            return;
        }
        inner.gate_owners.prepend = None;
        match result {
            Ok(mut page) => {
                let records = std::mem::take(&mut page.items);
                let Inner { items, seen, .. } = &mut *inner;
                let fresh: Vec<Movie> = records
                    .into_iter()
                    .map(Movie::from)
                    .filter(|movie| seen.insert(movie.id))
                    .collect();
                items.splice(0..0, fresh);
                inner.prev_token = page.prev;
                inner.edges.prepend = LoadState::NotLoading {
                    end_reached: page.prev.is_none(),
                };
                inner.last_page = Some(page);
            }
            Err(err) => {
                inner.edges.prepend = LoadState::Error(err);
            }
        }
        self.publish(&inner);
    }

    /// Re-issues the most recent failed load for the given edge.
    ///
    /// No-op if that edge is not in the error state. Idempotent: the edge
    /// gates and id dedup ensure a retry after partial success neither
    /// double-fetches nor duplicates items.
    pub async fn retry(&self, edge: LoadEdge) {
        let (failed, refresh_token) = {
            let inner = self.lock();
            (inner.edges.get(edge).is_error(), inner.refresh_token)
        };
        if !failed {
            debug!(?edge, "Retry dropped: edge not failed");
            return;
        }
        match edge {
            LoadEdge::Refresh => self.run_refresh(refresh_token).await,
            LoadEdge::Prepend => self.load_prepend().await,
            LoadEdge::Append => self.load_append().await,
        }
    }

    /// Switches the collection to a new anchor.
    ///
    /// No-op when the anchor is unchanged. Otherwise all accumulated state
    /// is discarded, in-flight loads are abandoned, the empty snapshot is
    /// published, and the first page of the new anchor is loaded.
    pub async fn set_anchor(&self, anchor: Option<MovieId>) {
        {
            let mut inner = self.lock();
            if inner.source.anchor() == anchor {
                return;
            }
            debug!(?anchor, "Anchor changed, restarting collection");
            inner.generation += 1;
            inner.gate_owners = EdgeOwners::default();
            inner.source = PageSource::new(self.catalog.clone(), anchor);
            inner.items.clear();
            inner.seen.clear();
            inner.next_token = None;
            inner.prev_token = None;
            inner.last_page = None;
            inner.refresh_token = None;
            inner.edges = EdgeStates::default();
            self.publish(&inner);
        }
        self.load_initial().await;
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn run_refresh(&self, token: Option<PageToken>) {
        let (generation, source) = {
            let mut inner = self.lock();
            if inner.edges.refresh.is_loading() {
                debug!("Refresh dropped: already in flight");
                return;
            }
            // A restart supersedes any in-flight prepend/append.
            inner.generation += 1;
            inner.refresh_token = token;
            inner.edges.refresh = LoadState::Loading;
            inner.gate_owners.refresh = Some(inner.generation);
            self.publish(&inner);
            (inner.generation, inner.source.clone())
        };

        let result = source.load(token).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("Stale refresh result, discarding");
            Self::release_stale_edge(&mut inner, LoadEdge::Refresh, generation);
            self.publish(&inner);
            return;
        }
        inner.gate_owners.refresh = None;
        match result {
            Ok(mut page) => {
                inner.items.clear();
                inner.seen.clear();
                let records = std::mem::take(&mut page.items);
                let Inner { items, seen, .. } = &mut *inner;
                items.extend(
                    records
                        .into_iter()
                        .map(Movie::from)
                        .filter(|movie| seen.insert(movie.id)),
                );
                inner.next_token = page.next;
                inner.prev_token = page.prev;
                inner.edges.refresh = LoadState::NotLoading {
                    end_reached: page.next.is_none(),
                };
                inner.edges.append = LoadState::NotLoading {
                    end_reached: page.next.is_none(),
                };
                inner.edges.prepend = LoadState::NotLoading {
                    end_reached: page.prev.is_none(),
                };
                inner.last_page = Some(page);
            }
            Err(err) => {
                // Already-loaded items stay; only the refresh edge fails.
                inner.edges.refresh = LoadState::Error(err);
            }
        }
        self.publish(&inner);
    }

    /// Releases the gate of an edge whose in-flight load was superseded,
    /// but only while that stale load still owns the gate. The discarded
    /// outcome must not leave the edge stuck in `Loading` (refresh failed
    /// without resetting it), yet a load the current generation started on
    /// the same edge keeps its `Loading` untouched.
    fn release_stale_edge(inner: &mut Inner, edge: LoadEdge, owner: u64) {
        let slot = inner.gate_owners.get_mut(edge);
        if *slot != Some(owner) {
            return;
        }
        *slot = None;
        let state = inner.edges.get_mut(edge);
        if state.is_loading() {
            *state = LoadState::default();
        }
    }

    fn publish(&self, inner: &Inner) {
        self.snapshot_tx.send_replace(PagedSnapshot {
            items: inner.items.clone(),
            edges: inner.edges.clone(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================
