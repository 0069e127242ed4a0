// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # CineFeed Core
//!
//! Core types, models, and traits for the CineFeed movie catalog client.
//!
//! This crate provides the foundational abstractions used across all other
//! CineFeed crates, including:
//!
//! - Transport and domain movie models
//! - The transport failure taxonomy and the error classifier
//! - The remote catalog port trait
//!
//! ## Key Types
//!
//! - [`MovieCatalog`] - Abstract remote catalog (page + detail lookups)
//! - [`MoviePage`] / [`MovieRecord`] - Transport-shaped responses
//! - [`Movie`] - Stable domain model with defaulted fields
//! - [`TransportError`] - Raw failures raised at the network boundary
//! - [`ClassifiedError`] / [`ErrorKind`] - User-displayable failures
//! - [`DataState`] - Loading/success/error wrapper for single-shot calls

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{classify, classify_lookup, ClassifiedError, ErrorKind, TransportError};

// Re-export all model types
pub use models::{DataState, Movie, MovieId, MoviePage, MovieRecord, PageToken, POSTER_BASE_URL};

// Re-export traits
pub use traits::MovieCatalog;
