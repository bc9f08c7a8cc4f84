//! TMDB movie client.
//!
//! Every request carries the configured `api_key`. Missing poster or backdrop
//! paths resolve to an inline SVG placeholder so cards never get an empty
//! image source.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{parse_base_url, CachedFetcher, HttpClient, ProviderError, DEFAULT_TIMEOUT};
use crate::config::ConfigError;
use crate::core::collections::{dedup_by_key, per_part, shuffle_take, truncate_text};
use crate::domain::queries::movie_queries;
use crate::domain::{Mood, Movie};

pub const PROVIDER: &str = "tmdb";

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Card descriptions are cut to this many characters
const DESCRIPTION_CHARS: usize = 150;

/// Configuration for the TMDB client
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Required; construction fails without it
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub timeout: Duration,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TmdbConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }
}

/// Trending time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Placeholder shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
}

/// Inline SVG "No Image" placeholder sized for a poster or backdrop
pub fn placeholder_image(kind: ImageKind) -> String {
    let (w, h) = match kind {
        ImageKind::Poster => (342, 513),
        ImageKind::Backdrop => (780, 439),
    };
    format!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}'%3E\
         %3Crect fill='%23282D35' width='{w}' height='{h}'/%3E\
         %3Ctext x='50%25' y='50%25' text-anchor='middle' dy='.3em' fill='%23898A85' \
         font-family='sans-serif' font-size='24'%3ENo Image%3C/text%3E%3C/svg%3E"
    )
}

// ============================================================================
// Response payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResultsPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
struct MoviePayload {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    popularity: Option<f64>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CastPayload {
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastPayload>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    site: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsPayload {
    #[serde(flatten)]
    movie: MoviePayload,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    budget: Option<u64>,
    revenue: Option<u64>,
    status: Option<String>,
    tagline: Option<String>,
    homepage: Option<String>,
    imdb_id: Option<String>,
    credits: Option<Credits>,
    videos: Option<ResultsPage<Video>>,
    similar: Option<ResultsPage<MoviePayload>>,
}

/// Cast member shown on the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// Full movie record for the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,

    /// `"{n} min"` or `N/A`
    pub runtime: String,

    pub genres: Vec<String>,
    pub budget: u64,
    pub revenue: u64,
    pub status: String,
    pub tagline: String,
    pub homepage: String,
    pub imdb_id: String,

    /// Name of the first crew member with job Director, else `Unknown`
    pub director: String,

    /// Top five billed cast members
    pub cast: Vec<CastMember>,

    /// First YouTube trailer
    pub trailer: Option<String>,

    pub similar: Vec<Movie>,
}

// ============================================================================
// Client
// ============================================================================

/// TMDB client with a 30 minute response cache
pub struct TmdbClient {
    fetcher: CachedFetcher,
    api_key: String,
    image_base_url: String,
}

impl TmdbClient {
    /// Build a client; fails fast when no API key is configured
    pub fn new(config: TmdbConfig, http: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                provider: PROVIDER,
                env_var: "TMDB_API_KEY",
            })?;
        let base_url = parse_base_url(PROVIDER, &config.base_url)?;

        Ok(Self {
            fetcher: CachedFetcher::new(PROVIDER, http, base_url, config.timeout, CACHE_TTL),
            api_key,
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Vec<(&str, String)>,
    ) -> Result<T, ProviderError> {
        let mut all = vec![("api_key", self.api_key.clone())];
        all.extend(params);
        self.fetcher.fetch_as(endpoint, &all).await
    }

    async fn fetch_movies(
        &self,
        endpoint: &str,
        params: Vec<(&str, String)>,
        limit: usize,
    ) -> Result<Vec<Movie>, ProviderError> {
        let page: ResultsPage<MoviePayload> = self.fetch(endpoint, params).await?;
        Ok(page
            .results
            .into_iter()
            .take(limit)
            .map(|m| self.format_movie(m))
            .collect())
    }

    async fn try_discover(&self, genres: &[u32], sort_by: &str, limit: usize) -> Result<Vec<Movie>, ProviderError> {
        let with_genres = genres.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
        let params = vec![
            ("with_genres", with_genres),
            ("sort_by", sort_by.to_string()),
            ("vote_count.gte", "100".to_string()),
            ("include_adult", "false".to_string()),
            ("language", "en-US".to_string()),
            ("page", "1".to_string()),
        ];
        self.fetch_movies("/discover/movie", params, limit).await
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ProviderError> {
        let params = vec![
            ("query", query.to_string()),
            ("include_adult", "false".to_string()),
            ("language", "en-US".to_string()),
            ("page", "1".to_string()),
        ];
        self.fetch_movies("/search/movie", params, limit).await
    }

    /// Movies matching all of `genres`; failures yield an empty list
    pub async fn discover_movies(&self, genres: &[u32], sort_by: &str, limit: usize) -> Vec<Movie> {
        self.try_discover(genres, sort_by, limit).await.unwrap_or_else(|e| {
            warn!(error = %e, "TMDB discover failed");
            Vec::new()
        })
    }

    /// Free-text movie search; failures yield an empty list
    pub async fn search_movies(&self, query: &str, limit: usize) -> Vec<Movie> {
        self.try_search(query, limit).await.unwrap_or_else(|e| {
            warn!(error = %e, query, "TMDB search failed");
            Vec::new()
        })
    }

    /// Trending movies; failures yield an empty list
    pub async fn trending_movies(&self, window: TrendingWindow, limit: usize) -> Vec<Movie> {
        let endpoint = format!("/trending/movie/{}", window.as_str());
        self.fetch_movies(&endpoint, Vec::new(), limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "TMDB trending failed");
                Vec::new()
            })
    }

    /// Full details with credits, videos and similar titles
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn movie_details(&self, id: &str) -> Result<MovieDetails, ProviderError> {
        let endpoint = format!("/movie/{}", id);
        let payload: DetailsPayload = self
            .fetch(&endpoint, vec![("append_to_response", "credits,videos,similar".to_string())])
            .await?;
        Ok(self.format_details(payload))
    }

    /// Mood movies: genre discovery plus a search on the first mood keyword.
    ///
    /// Falls back to the mood's static list only when both requests failed.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn get_mood_movies(&self, mood: Mood, limit: usize) -> Vec<Movie> {
        let criteria = movie_queries(mood);

        let discover = self.try_discover(criteria.genres, criteria.sort_by, limit);
        let keyword = criteria.keywords.first().copied();
        let search = async {
            match keyword {
                Some(k) => self.try_search(k, per_part(limit, 2)).await,
                None => Ok(Vec::new()),
            }
        };
        let (discovered, searched) = tokio::join!(discover, search);

        let mut failures = 0;
        let mut movies = Vec::new();
        for result in [discovered, searched] {
            match result {
                Ok(batch) => movies.extend(batch),
                Err(e) => {
                    warn!(error = %e, "TMDB mood request failed");
                    failures += 1;
                }
            }
        }

        if movies.is_empty() && failures > 0 {
            warn!(%mood, "Using TMDB fallback");
            let mut fallback = fallback_movies(mood);
            fallback.truncate(limit);
            return fallback;
        }

        let movies: Vec<Movie> = shuffle_take(dedup_by_key(movies, |m| m.id.clone()), limit)
            .into_iter()
            .map(|mut m| {
                m.mood = Some(mood);
                m
            })
            .collect();

        info!(%mood, count = movies.len(), "Loaded mood movies");
        movies
    }

    /// Poster URL at `size`, or the poster placeholder
    pub fn poster_url(&self, path: Option<&str>, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{}{}", self.image_base_url, size, p),
            None => placeholder_image(ImageKind::Poster),
        }
    }

    /// Backdrop URL at `size`, or the backdrop placeholder
    pub fn backdrop_url(&self, path: Option<&str>, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{}{}", self.image_base_url, size, p),
            None => placeholder_image(ImageKind::Backdrop),
        }
    }

    fn format_movie(&self, m: MoviePayload) -> Movie {
        let title = [&m.title, &m.original_title]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| "Untitled".to_string());
        let overview = m.overview.clone().filter(|o| !o.is_empty());
        let release_date = m.release_date.clone().filter(|d| !d.is_empty());
        let release_year = release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .unwrap_or("TBA")
            .to_string();

        Movie {
            id: m.id.to_string(),
            original_title: m.original_title.clone().unwrap_or_else(|| title.clone()),
            title,
            description: truncate_text(overview.as_deref().unwrap_or(""), DESCRIPTION_CHARS),
            overview: overview.unwrap_or_else(|| "No description available.".to_string()),
            release_date: release_date.unwrap_or_else(|| "TBA".to_string()),
            release_year,
            vote_average: m.vote_average,
            vote_count: m.vote_count.unwrap_or(0),
            popularity: m.popularity.unwrap_or(0.0),
            image: self.poster_url(m.poster_path.as_deref(), "w342"),
            image_large: self.poster_url(m.poster_path.as_deref(), "w500"),
            backdrop: self.backdrop_url(m.backdrop_path.as_deref(), "w780"),
            backdrop_large: self.backdrop_url(m.backdrop_path.as_deref(), "w1280"),
            genre_ids: m.genre_ids,
            link: format!("https://www.themoviedb.org/movie/{}", m.id),
            mood: None,
        }
    }

    fn format_details(&self, d: DetailsPayload) -> MovieDetails {
        let credits = d.credits.unwrap_or_default();
        let director = credits
            .crew
            .iter()
            .find(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let cast = credits
            .cast
            .into_iter()
            .take(5)
            .map(|c| CastMember {
                name: c.name,
                character: c.character.unwrap_or_default(),
                profile_path: c.profile_path,
            })
            .collect();
        let trailer = d
            .videos
            .and_then(|v| {
                v.results.into_iter().find(|v| {
                    v.kind.as_deref() == Some("Trailer") && v.site.as_deref() == Some("YouTube")
                })
            })
            .map(|v| format!("https://www.youtube.com/watch?v={}", v.key));
        let similar = d
            .similar
            .map(|s| s.results.into_iter().map(|m| self.format_movie(m)).collect())
            .unwrap_or_default();

        MovieDetails {
            movie: self.format_movie(d.movie),
            runtime: d
                .runtime
                .filter(|r| *r > 0)
                .map(|r| format!("{} min", r))
                .unwrap_or_else(|| "N/A".to_string()),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            budget: d.budget.unwrap_or(0),
            revenue: d.revenue.unwrap_or(0),
            status: d.status.unwrap_or_else(|| "Unknown".to_string()),
            tagline: d.tagline.unwrap_or_default(),
            homepage: d.homepage.unwrap_or_default(),
            imdb_id: d.imdb_id.unwrap_or_default(),
            director,
            cast,
            trailer,
            similar,
        }
    }

    pub fn clear_cache(&self) {
        self.fetcher.clear_cache();
        info!("TMDB cache cleared");
    }
}

/// Static entries shown when TMDB is unreachable.
///
/// Each entry points at the TMDB search page for one mood keyword.
pub fn fallback_movies(mood: Mood) -> Vec<Movie> {
    let criteria = movie_queries(mood);
    criteria
        .keywords
        .iter()
        .take(3)
        .enumerate()
        .map(|(n, keyword)| Movie {
            id: format!("fallback-{}-{}", mood, n + 1),
            title: format!("Browse \"{}\" films", keyword),
            original_title: keyword.to_string(),
            overview: criteria.description.to_string(),
            release_date: "TBA".to_string(),
            release_year: "TBA".to_string(),
            vote_average: None,
            vote_count: 0,
            popularity: 0.0,
            image: placeholder_image(ImageKind::Poster),
            image_large: placeholder_image(ImageKind::Poster),
            backdrop: placeholder_image(ImageKind::Backdrop),
            backdrop_large: placeholder_image(ImageKind::Backdrop),
            genre_ids: criteria.genres.to_vec(),
            description: criteria.description.to_string(),
            link: format!(
                "https://www.themoviedb.org/search/movie?query={}",
                keyword.replace(' ', "%20")
            ),
            mood: Some(mood),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StubHttpClient;
    use serde_json::json;

    fn client(stub: StubHttpClient) -> TmdbClient {
        TmdbClient::new(TmdbConfig::with_api_key("k"), Arc::new(stub)).unwrap()
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = TmdbClient::new(TmdbConfig::default(), Arc::new(StubHttpClient::new()))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MissingApiKey { provider: "tmdb", .. }));

        let blank = TmdbConfig::with_api_key("  ");
        assert!(TmdbClient::new(blank, Arc::new(StubHttpClient::new())).is_err());
    }

    #[test]
    fn test_poster_placeholder() {
        let c = client(StubHttpClient::new());
        assert!(c.poster_url(None, "w342").starts_with("data:image/svg+xml"));
        assert!(c.poster_url(None, "w342").contains("width='342'"));
        assert!(c.backdrop_url(Some(""), "w780").contains("width='780'"));
        assert_eq!(
            c.poster_url(Some("/abc.jpg"), "w500"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_format_movie_defaults() {
        let c = client(StubHttpClient::new());
        let movie = c.format_movie(MoviePayload {
            id: 603,
            title: None,
            original_title: None,
            overview: None,
            release_date: None,
            vote_average: Some(8.234),
            vote_count: None,
            popularity: None,
            poster_path: None,
            backdrop_path: None,
            genre_ids: vec![],
        });
        assert_eq!(movie.title, "Untitled");
        assert_eq!(movie.overview, "No description available.");
        assert_eq!(movie.release_year, "TBA");
        assert_eq!(movie.rating_label(), "8.2");
        assert_eq!(movie.description, "");
        assert_eq!(movie.link, "https://www.themoviedb.org/movie/603");
    }

    #[tokio::test]
    async fn test_details_director_cast_trailer() {
        let body = json!({
            "id": 1, "title": "Arrival", "release_date": "2016-11-10", "runtime": 116,
            "genres": [{"name": "Drama"}],
            "credits": {
                "crew": [{"name": "Joe Walker", "job": "Editor"}, {"name": "Denis Villeneuve", "job": "Director"}],
                "cast": [
                    {"name": "A", "character": "a"}, {"name": "B", "character": "b"},
                    {"name": "C", "character": "c"}, {"name": "D", "character": "d"},
                    {"name": "E", "character": "e"}, {"name": "F", "character": "f"}
                ]
            },
            "videos": {"results": [
                {"key": "teaser", "site": "YouTube", "type": "Teaser"},
                {"key": "tFMo3UJ4B4g", "site": "YouTube", "type": "Trailer"}
            ]}
        });
        let c = client(StubHttpClient::new().respond("/movie/1", body));

        let details = c.movie_details("1").await.unwrap();
        assert_eq!(details.movie.release_year, "2016");
        assert_eq!(details.runtime, "116 min");
        assert_eq!(details.director, "Denis Villeneuve");
        assert_eq!(details.cast.len(), 5);
        assert_eq!(
            details.trailer.as_deref(),
            Some("https://www.youtube.com/watch?v=tFMo3UJ4B4g")
        );
    }

    #[tokio::test]
    async fn test_mood_movies_dedup_across_requests() {
        let page = json!({"results": [{"id": 1, "title": "One"}, {"id": 2, "title": "Two"}]});
        let c = client(
            StubHttpClient::new()
                .respond("/discover/movie", page.clone())
                .respond("/search/movie", page),
        );

        let movies = c.get_mood_movies(Mood::Focus, 12).await;
        assert_eq!(movies.len(), 2);
        assert!(movies.iter().all(|m| m.mood == Some(Mood::Focus)));
    }

    #[tokio::test]
    async fn test_mood_movies_fallback_offline() {
        let c = client(StubHttpClient::new());
        let movies = c.get_mood_movies(Mood::Melancholy, 12).await;
        assert!(!movies.is_empty());
        assert!(movies[0].image.starts_with("data:image/svg+xml"));
    }
}
