//! Per-edge load state.
//!
//! Each edge of an incremental collection (refresh, prepend, append) carries
//! its own small state machine. The `Loading` state doubles as the
//! mutual-exclusion gate: a load request for an edge that is already
//! `Loading` is dropped, not queued.

use cinefeed_core::ClassifiedError;

// ============================================================================
// Load State
// ============================================================================

/// State of one load edge.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// No load in flight. `end_reached` is true once the catalog has no
    /// further page in this direction.
    NotLoading {
        /// Whether pagination in this direction is exhausted.
        end_reached: bool,
    },
    /// A load is in flight; further requests for this edge are dropped.
    Loading,
    /// The most recent load failed. Retryable.
    Error(ClassifiedError),
}

impl LoadState {
    /// Returns true if a load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the most recent load failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns true if pagination in this direction is exhausted.
    pub fn end_reached(&self) -> bool {
        matches!(self, Self::NotLoading { end_reached: true })
    }

    /// Returns the classified error, if any.
    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::NotLoading { end_reached: false }
    }
}

// ============================================================================
// Load Edge
// ============================================================================

/// One of the three load points of an incremental collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadEdge {
    /// Initial load / full restart.
    Refresh,
    /// Loading pages before the first loaded page.
    Prepend,
    /// Loading pages after the last loaded page.
    Append,
}

/// Load state of all three edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeStates {
    /// Initial/refresh edge.
    pub refresh: LoadState,
    /// Prepend edge.
    pub prepend: LoadState,
    /// Append edge.
    pub append: LoadState,
}

impl EdgeStates {
    /// Returns the state of one edge.
    pub fn get(&self, edge: LoadEdge) -> &LoadState {
        match edge {
            LoadEdge::Refresh => &self.refresh,
            LoadEdge::Prepend => &self.prepend,
            LoadEdge::Append => &self.append,
        }
    }

    /// Returns a mutable reference to the state of one edge.
    pub fn get_mut(&mut self, edge: LoadEdge) -> &mut LoadState {
        match edge {
            LoadEdge::Refresh => &mut self.refresh,
            LoadEdge::Prepend => &mut self.prepend,
            LoadEdge::Append => &mut self.append,
        }
    }

    /// Returns the first failed edge, if any.
    pub fn first_error(&self) -> Option<(LoadEdge, &ClassifiedError)> {
        [LoadEdge::Refresh, LoadEdge::Prepend, LoadEdge::Append]
            .into_iter()
            .find_map(|edge| self.get(edge).error().map(|err| (edge, err)))
    }
}

// ============================================================================
// Tests
// ============================================================================
