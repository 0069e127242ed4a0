//! Data models for CineFeed.

mod movie;
mod state;

pub use movie::{Movie, MovieId, MoviePage, MovieRecord, PageToken, POSTER_BASE_URL};
pub use state::DataState;
