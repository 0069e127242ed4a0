//! TMDB implementation of the movie catalog port.

use async_trait::async_trait;
use cinefeed_core::{MovieCatalog, MovieId, MoviePage, MovieRecord, PageToken, TransportError};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::client::HttpClient;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Person id used to scope the root catalog (`discover` endpoint).
const DEFAULT_PERSON_ID: u64 = 71580;

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the TMDB client.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API base URL. Must end with a slash.
    pub base_url: Url,
    /// TMDB API key, sent as the `api_key` query parameter.
    pub api_key: String,
    /// Person id the root catalog is filtered by.
    pub person_id: u64,
    /// Response language.
    pub language: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl TmdbConfig {
    /// Creates a configuration with default endpoint settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key: api_key.into(),
            person_id: DEFAULT_PERSON_ID,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the person id the root catalog is filtered by.
    pub fn with_person_id(mut self, person_id: u64) -> Self {
        self.person_id = person_id;
        self
    }

    /// Sets the response language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// TMDB-backed [`MovieCatalog`].
#[derive(Debug, Clone)]
pub struct TmdbClient {
    config: TmdbConfig,
    http: HttpClient,
}

impl TmdbClient {
    /// Creates a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, TransportError> {
        let http = HttpClient::with_timeout(config.timeout)?;
        Ok(Self { config, http })
    }

    /// Builds the root catalog URL: `discover/movie` filtered by person.
    fn discover_url(&self, page: PageToken) -> Result<Url, TransportError> {
        let mut url = self.join("discover/movie")?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("with_people", &self.config.person_id.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("sort_by", "popularity.desc")
            .append_pair("language", &self.config.language)
            .append_pair("include_adult", "false");
        Ok(url)
    }

    /// Builds the anchored catalog URL: movies similar to `movie_id`.
    fn similar_url(&self, movie_id: MovieId, page: PageToken) -> Result<Url, TransportError> {
        let mut url = self.join(&format!("movie/{movie_id}/similar"))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("page", &page.to_string())
            .append_pair("language", &self.config.language);
        Ok(url)
    }

    /// Builds the single-movie lookup URL.
    fn detail_url(&self, movie_id: MovieId) -> Result<Url, TransportError> {
        let mut url = self.join(&format!("movie/{movie_id}"))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("language", &self.config.language);
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, TransportError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| TransportError::Other(format!("invalid endpoint URL: {e}")))
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        anchor: Option<MovieId>,
        page: PageToken,
    ) -> Result<MoviePage, TransportError> {
        let url = match anchor {
            Some(movie_id) => self.similar_url(movie_id, page)?,
            None => self.discover_url(page)?,
        };

        let response: MoviePage = self.http.get_json(url).await?;
        debug!(
            page = response.page,
            total_pages = response.total_pages,
            results = response.results.len(),
            "Fetched catalog page"
        );
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn fetch_detail(&self, id: MovieId) -> Result<MovieRecord, TransportError> {
        let url = self.detail_url(id)?;
        let record: MovieRecord = self.http.get_json(url).await?;
        debug!(id = record.id, "Fetched movie detail");
        Ok(record)
    }
}

// ============================================================================
// Tests
// ============================================================================
