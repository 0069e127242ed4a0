//! JSON output formatting.

use anyhow::Result;
use cinefeed_core::{ClassifiedError, Movie};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a single movie.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieOutput {
    pub id: u64,
    pub title: String,
    pub poster_url: String,
    pub overview: String,
}

/// JSON output for a movie list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOutput {
    pub count: usize,
    pub movies: Vec<MovieOutput>,
}

/// JSON output for a classified error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats an accumulated movie list.
    pub fn format_movies(&self, movies: &[Movie]) -> Result<String> {
        let output = ListOutput {
            count: movies.len(),
            movies: movies.iter().map(movie_to_output).collect(),
        };
        self.format(&output)
    }

    /// Formats a single movie detail.
    pub fn format_movie_detail(&self, movie: &Movie) -> Result<String> {
        self.format(&movie_to_output(movie))
    }

    /// Formats a classified error. Falls back to the plain message if
    /// serialization itself fails.
    pub fn format_error(&self, error: &ClassifiedError) -> String {
        let output = ErrorOutput {
            kind: format!("{:?}", error.kind),
            message: error.message.clone(),
            http_code: error.http_code,
        };
        self.format(&output)
            .unwrap_or_else(|_| error.message.clone())
    }
}

/// Converts a movie to output.
fn movie_to_output(movie: &Movie) -> MovieOutput {
    MovieOutput {
        id: movie.id,
        title: movie.title.clone(),
        poster_url: movie.poster_url.clone(),
        overview: movie.overview.clone(),
    }
}
