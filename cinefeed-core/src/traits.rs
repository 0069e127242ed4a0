//! Trait definitions for CineFeed.
//!
//! This module defines the remote catalog port consumed by the pagination
//! engine and the detail pipeline.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::{MovieId, MoviePage, MovieRecord, PageToken};

/// Abstract remote movie catalog.
///
/// Implementors are responsible for talking to the upstream API and raising
/// raw [`TransportError`]s; classification into user-facing errors happens
/// downstream, never here.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetches one page of the catalog.
    ///
    /// `anchor = None` queries the root catalog; `anchor = Some(id)` queries
    /// movies related to `id`. These are two different upstream query shapes
    /// behind one contract.
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError>;

    /// Fetches a single movie record by id.
    async fn fetch_detail(&self, id: MovieId) -> Result<MovieRecord, TransportError>;
}
