//! Page source: resolves page tokens against the remote catalog.

use std::sync::Arc;

use cinefeed_core::{
    classify, ClassifiedError, MovieCatalog, MovieId, MovieRecord, PageToken,
};
use tracing::{debug, warn};

/// The first page of any catalog.
pub const FIRST_PAGE: PageToken = 1;

// ============================================================================
// Page Result
// ============================================================================

/// One successfully loaded page plus its neighbor tokens.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Raw records of this page, unmapped and in upstream order.
    pub items: Vec<MovieRecord>,
    /// The token this page was loaded with.
    pub current: PageToken,
    /// Token of the following page; `None` once the catalog is exhausted.
    pub next: Option<PageToken>,
    /// Token of the preceding page; `None` on the first page.
    pub prev: Option<PageToken>,
}

// ============================================================================
// Page Source
// ============================================================================

/// Loads single pages from the remote catalog, scoped to one anchor.
///
/// `anchor = None` pages through the root catalog; `anchor = Some(id)` pages
/// through movies related to that id. The source never retries: a failed
/// load is classified and handed back, and retry is the caller's decision.
#[derive(Clone)]
pub struct PageSource {
    catalog: Arc<dyn MovieCatalog>,
    anchor: Option<MovieId>,
}

impl PageSource {
    /// Creates a page source for the given anchor.
    pub fn new(catalog: Arc<dyn MovieCatalog>, anchor: Option<MovieId>) -> Self {
        Self { catalog, anchor }
    }

    /// The anchor this source is scoped to.
    pub fn anchor(&self) -> Option<MovieId> {
        self.anchor
    }

    /// Loads one page. `token = None` loads the first page.
    ///
    /// On success the neighbor tokens are derived from the response:
    /// `next` exists while the current page is below `total_pages`, `prev`
    /// for everything past page one.
    pub async fn load(&self, token: Option<PageToken>) -> Result<PageResult, ClassifiedError> {
        let page = token.unwrap_or(FIRST_PAGE);
        debug!(page, anchor = ?self.anchor, "Loading catalog page");

        match self.catalog.fetch_page(self.anchor, page).await {
            Ok(response) => {
                let next = (page < response.total_pages).then(|| page + 1);
                let prev = (page > FIRST_PAGE).then(|| page - 1);
                Ok(PageResult {
                    items: response.results,
                    current: page,
                    next,
                    prev,
                })
            }
            Err(err) => {
                warn!(page, anchor = ?self.anchor, error = %err, "Page load failed");
                Err(classify(err))
            }
        }
    }

    /// Decides where a restarted collection should resume, given the page
    /// closest to the last viewed position.
    ///
    /// Policy: the page after `prev`, else the page before `next`, else
    /// start from scratch.
    pub fn refresh_key(last: Option<&PageResult>) -> Option<PageToken> {
        let page = last?;
        page.prev.map(|t| t + 1).or_else(|| page.next.map(|t| t - 1))
    }
}

// ============================================================================
// Tests
// ============================================================================
