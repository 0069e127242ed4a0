//! End-to-end pagination flows against controllable in-memory catalogs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cinefeed_core::{
    ErrorKind, MovieCatalog, MovieId, MoviePage, MovieRecord, PageToken, TransportError,
};
use cinefeed_paging::{LoadEdge, PagedCollection, PagedSnapshot};
use tokio::sync::Semaphore;

fn record(id: MovieId) -> MovieRecord {
    MovieRecord {
        id,
        title: Some(format!("Movie {id}")),
        poster_path: None,
        overview: None,
        release_date: None,
    }
}

/// Two records per page; ids encode the anchor so cross-anchor leaks are
/// detectable.
fn page_for(anchor: Option<MovieId>, page: PageToken, total_pages: PageToken) -> MoviePage {
    let base = anchor.unwrap_or(0) * 1000 + u64::from(page) * 10;
    MoviePage {
        page,
        results: vec![record(base), record(base + 1)],
        total_pages,
    }
}

fn ids(snapshot: &PagedSnapshot) -> Vec<MovieId> {
    snapshot.items.iter().map(|m| m.id).collect()
}

// ============================================================================
// Catalogs
// ============================================================================

/// Catalog whose page fetches block until released, one permit per fetch.
struct GatedCatalog {
    total_pages: PageToken,
    permits: Semaphore,
    page_calls: AtomicUsize,
}

impl GatedCatalog {
    fn new(total_pages: PageToken) -> Self {
        Self {
            total_pages,
            permits: Semaphore::new(0),
            page_calls: AtomicUsize::new(0),
        }
    }

    fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }

    fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieCatalog for GatedCatalog {
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.permits.acquire().await.unwrap().forget();
        Ok(page_for(anchor, page, self.total_pages))
    }

    async fn fetch_detail(&self, _id: MovieId) -> Result<MovieRecord, TransportError> {
        Err(TransportError::Other("detail not stubbed".into()))
    }
}

/// Catalog that blocks every fetch on its own gate, keyed by call order, so
/// tests can resolve in-flight fetches in any order.
struct CallGatedCatalog {
    total_pages: PageToken,
    next_call: AtomicUsize,
    gates: std::sync::Mutex<Vec<Arc<tokio::sync::Notify>>>,
}

impl CallGatedCatalog {
    fn new(total_pages: PageToken) -> Self {
        Self {
            total_pages,
            next_call: AtomicUsize::new(0),
            gates: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn gate(&self, call: usize) -> Arc<tokio::sync::Notify> {
        let mut gates = self.gates.lock().unwrap();
        while gates.len() <= call {
            gates.push(Arc::new(tokio::sync::Notify::new()));
        }
        gates[call].clone()
    }

    fn release(&self, call: usize) {
        self.gate(call).notify_one();
    }

    fn page_calls(&self) -> usize {
        self.next_call.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieCatalog for CallGatedCatalog {
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        let call = self.next_call.fetch_add(1, Ordering::SeqCst);
        self.gate(call).notified().await;
        Ok(page_for(anchor, page, self.total_pages))
    }

    async fn fetch_detail(&self, _id: MovieId) -> Result<MovieRecord, TransportError> {
        Err(TransportError::Other("detail not stubbed".into()))
    }
}

/// Plain three-page catalog.
struct PlainCatalog;

#[async_trait]
impl MovieCatalog for PlainCatalog {
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        Ok(page_for(anchor, page, 3))
    }

    async fn fetch_detail(&self, _id: MovieId) -> Result<MovieRecord, TransportError> {
        Err(TransportError::Other("detail not stubbed".into()))
    }
}

/// Catalog where page 2 fails on its first attempt, then succeeds with a
/// record overlapping page 1.
struct FlakyAppendCatalog {
    page_two_attempts: AtomicUsize,
}

#[async_trait]
impl MovieCatalog for FlakyAppendCatalog {
    async fn fetch_page(
        &self,
        _anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        let results = match page {
            1 => vec![record(1), record(2)],
            2 => {
                if self.page_two_attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(TransportError::Timeout);
                }
                vec![record(2), record(3)]
            }
            _ => unreachable!("catalog has two pages"),
        };
        Ok(MoviePage {
            page,
            results,
            total_pages: 2,
        })
    }

    async fn fetch_detail(&self, _id: MovieId) -> Result<MovieRecord, TransportError> {
        Err(TransportError::Other("detail not stubbed".into()))
    }
}

/// Page 1 succeeds once then fails; page 2 blocks until released.
struct StuckGateCatalog {
    page_one_calls: AtomicUsize,
    page_two_gate: tokio::sync::Notify,
}

impl StuckGateCatalog {
    fn new() -> Self {
        Self {
            page_one_calls: AtomicUsize::new(0),
            page_two_gate: tokio::sync::Notify::new(),
        }
    }
}

#[async_trait]
impl MovieCatalog for StuckGateCatalog {
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        match page {
            1 => {
                if self.page_one_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(page_for(anchor, 1, 2))
                } else {
                    Err(TransportError::Connect("dns".into()))
                }
            }
            _ => {
                self.page_two_gate.notified().await;
                Ok(page_for(anchor, page, 2))
            }
        }
    }

    async fn fetch_detail(&self, _id: MovieId) -> Result<MovieRecord, TransportError> {
        Err(TransportError::Other("detail not stubbed".into()))
    }
}

/// Catalog that fails every fetch until `heal` is called.
struct HealingCatalog {
    healed: std::sync::atomic::AtomicBool,
}

impl HealingCatalog {
    fn new() -> Self {
        Self {
            healed: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn heal(&self) {
        self.healed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MovieCatalog for HealingCatalog {
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        if self.healed.load(Ordering::SeqCst) {
            Ok(page_for(anchor, page, 1))
        } else {
            Err(TransportError::Connect("dns".into()))
        }
    }

    async fn fetch_detail(&self, _id: MovieId) -> Result<MovieRecord, TransportError> {
        Err(TransportError::Other("detail not stubbed".into()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn wait_until(collection: &PagedCollection, predicate: impl Fn(&PagedSnapshot) -> bool) {
    while !predicate(&collection.snapshot()) {
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_append_is_dropped_not_queued() {
    let catalog = Arc::new(GatedCatalog::new(3));
    let collection = Arc::new(PagedCollection::new(catalog.clone(), None));

    catalog.release(1);
    collection.load_initial().await;
    assert_eq!(catalog.page_calls(), 1);

    let background = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.load_append().await })
    };
    wait_until(&collection, |s| s.edges.append.is_loading()).await;

    // Second append while the first is in flight: dropped, no extra fetch.
    collection.load_append().await;
    assert_eq!(catalog.page_calls(), 2);

    catalog.release(1);
    background.await.unwrap();
    assert_eq!(catalog.page_calls(), 2);
    assert_eq!(ids(&collection.snapshot()), vec![10, 11, 20, 21]);
}

#[tokio::test]
async fn test_anchor_change_resets_before_new_items_appear() {
    let catalog = Arc::new(GatedCatalog::new(2));
    let collection = Arc::new(PagedCollection::new(catalog.clone(), None));

    catalog.release(1);
    collection.load_initial().await;
    assert_eq!(ids(&collection.snapshot()), vec![10, 11]);

    let switching = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.set_anchor(Some(7)).await })
    };
    wait_until(&collection, |s| s.edges.refresh.is_loading()).await;

    // Invalidation published the empty list before the new anchor's first
    // page resolved.
    assert!(collection.snapshot().items.is_empty());

    catalog.release(1);
    switching.await.unwrap();
    assert_eq!(ids(&collection.snapshot()), vec![7010, 7011]);
    assert_eq!(collection.anchor(), Some(7));
}

#[tokio::test]
async fn test_anchor_change_abandons_inflight_append() {
    let catalog = Arc::new(GatedCatalog::new(3));
    let collection = Arc::new(PagedCollection::new(catalog.clone(), None));

    catalog.release(1);
    collection.load_initial().await;

    let appending = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.load_append().await })
    };
    wait_until(&collection, |s| s.edges.append.is_loading()).await;

    let switching = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.set_anchor(Some(5)).await })
    };
    wait_until(&collection, |s| s.items.is_empty()).await;

    // Permits release in FIFO order: the stale append resolves first and is
    // discarded, then the new anchor's refresh resolves.
    catalog.release(2);
    appending.await.unwrap();
    switching.await.unwrap();

    let snapshot = collection.snapshot();
    assert_eq!(ids(&snapshot), vec![5010, 5011]);
    assert!(!snapshot.edges.append.is_loading());
}

#[tokio::test]
async fn test_superseded_append_never_releases_the_next_loads_gate() {
    let catalog = Arc::new(CallGatedCatalog::new(3));
    let collection = Arc::new(PagedCollection::new(catalog.clone(), None));

    // Call 0: initial load of page 1.
    catalog.release(0);
    collection.load_initial().await;

    // Call 1: append blocks on page 2.
    let stale_append = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.load_append().await })
    };
    wait_until(&collection, |s| s.edges.append.is_loading()).await;

    // Call 2: a full restart supersedes the blocked append and completes.
    catalog.release(2);
    collection.load_initial().await;
    assert_eq!(ids(&collection.snapshot()), vec![10, 11]);

    // Call 3: a fresh append for the new generation blocks on page 2.
    let live_append = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.load_append().await })
    };
    wait_until(&collection, |s| s.edges.append.is_loading()).await;

    // The superseded append resolves last. Its discarded outcome must not
    // release the gate the live append is holding.
    catalog.release(1);
    stale_append.await.unwrap();
    assert!(collection.snapshot().edges.append.is_loading());

    // With the gate held, another append is dropped without a fetch.
    collection.load_append().await;
    assert_eq!(catalog.page_calls(), 4);

    catalog.release(3);
    live_append.await.unwrap();

    let snapshot = collection.snapshot();
    assert!(!snapshot.edges.append.is_loading());
    assert_eq!(ids(&snapshot), vec![10, 11, 20, 21]);
}

#[tokio::test]
async fn test_failed_refresh_unsticks_superseded_append_gate() {
    let catalog = Arc::new(StuckGateCatalog::new());
    let collection = Arc::new(PagedCollection::new(catalog.clone(), None));

    collection.load_initial().await;
    assert_eq!(ids(&collection.snapshot()), vec![10, 11]);

    // Append blocks on page 2.
    let stale_append = {
        let collection = collection.clone();
        tokio::spawn(async move { collection.load_append().await })
    };
    wait_until(&collection, |s| s.edges.append.is_loading()).await;

    // The restart supersedes the append but fails itself, so it never
    // resets the append edge.
    collection.load_initial().await;
    assert!(collection.snapshot().edges.refresh.is_error());

    // The discarded append still owns its gate and must release it.
    catalog.page_two_gate.notify_one();
    stale_append.await.unwrap();

    let snapshot = collection.snapshot();
    assert!(!snapshot.edges.append.is_loading());
    assert!(!snapshot.edges.append.is_error());
}

#[tokio::test]
async fn test_retry_append_after_failure_is_idempotent() {
    let catalog = Arc::new(FlakyAppendCatalog {
        page_two_attempts: AtomicUsize::new(0),
    });
    let collection = PagedCollection::new(catalog, None);

    collection.load_initial().await;
    collection.load_append().await;

    let snapshot = collection.snapshot();
    let err = snapshot.edges.append.error().unwrap();
    assert_eq!(err.kind, ErrorKind::Timeout);
    // Partial success preserved.
    assert_eq!(ids(&snapshot), vec![1, 2]);

    collection.retry(LoadEdge::Append).await;

    let snapshot = collection.snapshot();
    // Same page re-fetched; the overlapping record was not duplicated.
    assert_eq!(ids(&snapshot), vec![1, 2, 3]);
    assert!(snapshot.edges.append.end_reached());
}

#[tokio::test]
async fn test_retry_refresh_after_failure() {
    let catalog = Arc::new(HealingCatalog::new());
    let collection = PagedCollection::new(catalog.clone(), None);

    collection.load_initial().await;
    let err = collection.snapshot().edges.refresh.error().unwrap().clone();
    assert_eq!(err.kind, ErrorKind::NoConnection);
    assert_eq!(err.message, "No internet connection.");

    catalog.heal();
    collection.retry(LoadEdge::Refresh).await;

    let snapshot = collection.snapshot();
    assert_eq!(ids(&snapshot), vec![10, 11]);
    assert!(snapshot.edges.refresh.end_reached());
}

#[tokio::test]
async fn test_refresh_resumes_at_last_page_and_allows_prepend() {
    let collection = PagedCollection::new(Arc::new(PlainCatalog), None);

    collection.load_initial().await;
    collection.load_append().await;
    assert_eq!(ids(&collection.snapshot()), vec![10, 11, 20, 21]);

    // Refresh key of the last loaded page (2) is prev + 1 = 2: the
    // collection restarts there instead of from scratch.
    collection.refresh().await;
    let snapshot = collection.snapshot();
    assert_eq!(ids(&snapshot), vec![20, 21]);
    assert!(!snapshot.edges.prepend.end_reached());

    collection.load_prepend().await;
    let snapshot = collection.snapshot();
    assert_eq!(ids(&snapshot), vec![10, 11, 20, 21]);
    assert!(snapshot.edges.prepend.end_reached());
}
