//! Movie models: transport records and the domain shape.

use serde::{Deserialize, Serialize};

/// Identifier of a movie, unique within one upstream catalog.
pub type MovieId = u64;

/// Page identifier used to request the next/previous page. Page 1 is first.
pub type PageToken = u32;

/// Base path prefixed to raw poster paths when building [`Movie::poster_url`].
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// ============================================================================
// Transport Records
// ============================================================================

/// One page of raw movie records as returned by the remote catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    /// The page this response covers.
    pub page: PageToken,
    /// Raw records, in upstream order.
    pub results: Vec<MovieRecord>,
    /// Total number of pages the catalog currently has.
    pub total_pages: PageToken,
}

/// Transport-shaped movie record. Everything but the id may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    /// Upstream movie id.
    pub id: MovieId,
    /// Title, if the upstream has one.
    #[serde(default)]
    pub title: Option<String>,
    /// Poster image path fragment.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Synopsis.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date as an upstream-formatted string.
    #[serde(default)]
    pub release_date: Option<String>,
}

// ============================================================================
// Domain Model
// ============================================================================

/// Domain movie, decoupled from the transport layer.
///
/// Built only via [`From<MovieRecord>`]; immutable once constructed, with
/// all optional upstream fields defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    /// Upstream movie id.
    pub id: MovieId,
    /// Title, never empty.
    pub title: String,
    /// Full poster URL, or empty string when the upstream has no poster.
    pub poster_url: String,
    /// Synopsis, never empty.
    pub overview: String,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Self {
            id: record.id,
            title: record
                .title
                .unwrap_or_else(|| "No title available.".to_string()),
            poster_url: record
                .poster_path
                .map(|path| format!("{POSTER_BASE_URL}{path}"))
                .unwrap_or_default(),
            overview: record
                .overview
                .unwrap_or_else(|| "No description available.".to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: MovieId) -> MovieRecord {
        MovieRecord {
            id,
            title: None,
            poster_path: None,
            overview: None,
            release_date: None,
        }
    }

    #[test]
    fn test_map_full_record() {
        let mut rec = record(603);
        rec.title = Some("The Matrix".into());
        rec.poster_path = Some("/matrix.jpg".into());
        rec.overview = Some("A hacker learns the truth.".into());

        let movie = Movie::from(rec);
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.poster_url, "https://image.tmdb.org/t/p/w500/matrix.jpg");
        assert_eq!(movie.overview, "A hacker learns the truth.");
    }

    #[test]
    fn test_map_defaults_for_absent_fields() {
        let movie = Movie::from(record(1));
        assert_eq!(movie.title, "No title available.");
        assert_eq!(movie.poster_url, "");
        assert_eq!(movie.overview, "No description available.");
    }

    #[test]
    fn test_deserialize_page_with_sparse_records() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 10, "title": "Doctor Strange", "poster_path": "/ds.jpg"},
                {"id": 11}
            ],
            "total_pages": 3
        }"#;
        let page: MoviePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title.as_deref(), Some("Doctor Strange"));
        assert!(page.results[1].title.is_none());
        assert!(page.results[1].overview.is_none());
    }

    #[test]
    fn test_deserialize_record_ignores_extra_fields() {
        let json = r#"{"id": 5, "title": "1917", "vote_average": 7.9, "adult": false}"#;
        let rec: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, 5);
        assert_eq!(rec.title.as_deref(), Some("1917"));
    }
}
