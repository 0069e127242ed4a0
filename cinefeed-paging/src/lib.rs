// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # CineFeed Paging
//!
//! The incremental pagination engine and the single-result pipeline, both
//! built on the [`cinefeed_core::MovieCatalog`] port.
//!
//! ## Paged consumption
//!
//! - [`PageSource`] - loads one page at a time, deriving next/prev tokens
//!   and classifying failures; never retries on its own
//! - [`PagedCollection`] - accumulates pages into one duplicate-free list
//!   with independent load state per edge ([`LoadState`]), manual
//!   [`PagedCollection::retry`], and a full restart on anchor change
//! - [`PagedSnapshot`] - the observable list + edge-state pairs, published
//!   through a watch channel
//!
//! ## Single-shot consumption
//!
//! - [`lookup`] - one fetch wrapped in [`cinefeed_core::DataState`]
//! - [`DetailPipeline`] - latest-wins lookups; superseded results are
//!   discarded, never delivered
//!
//! ## Example
//!
//! ```ignore
//! use cinefeed_paging::PagedCollection;
//!
//! let collection = PagedCollection::new(catalog, None);
//! let mut snapshots = collection.subscribe();
//!
//! collection.load_initial().await;
//! collection.load_append().await;
//!
//! let snapshot = snapshots.borrow_and_update();
//! println!("{} movies", snapshot.items.len());
//! ```

pub mod collection;
pub mod detail;
pub mod source;
pub mod state;

// Re-export key types at crate root
pub use collection::{PagedCollection, PagedSnapshot};
pub use detail::{lookup, DetailPipeline, DetailState};
pub use source::{PageResult, PageSource, FIRST_PAGE};
pub use state::{EdgeStates, LoadEdge, LoadState};
