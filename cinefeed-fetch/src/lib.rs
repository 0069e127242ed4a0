// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # CineFeed Fetch
//!
//! HTTP transport and the TMDB implementation of the movie catalog port.
//!
//! This crate owns the one boundary that crosses the network:
//!
//! - [`HttpClient`] - thin reqwest wrapper that raises raw transport
//!   failures ([`cinefeed_core::TransportError`]) and never retries
//! - [`TmdbClient`] / [`TmdbConfig`] - the TMDB endpoints behind
//!   [`cinefeed_core::MovieCatalog`]
//!
//! Failure classification does not happen here; raw transport failures are
//! translated downstream by the core classifier.

pub mod client;
pub mod tmdb;

pub use client::HttpClient;
pub use tmdb::{TmdbClient, TmdbConfig};
