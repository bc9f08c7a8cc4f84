//! Debounced cross-provider search.
//!
//! Each input takes a [`RequestToken`]. After the debounce delay and again
//! after the fetch, the token is checked against the latest issued one; only
//! the most recent input may commit results. A slow early query can never
//! overwrite the results of a faster later one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::{DeezerClient, TmdbClient};
use crate::core::{RequestSequence, RequestToken};
use crate::domain::{ContentItem, Movie, MusicItem};
use crate::hub::Providers;

pub const DEBOUNCE: Duration = Duration::from_millis(500);

const TRACK_LIMIT: usize = 8;
const PLAYLIST_LIMIT: usize = 6;
const MUSIC_LIMIT: usize = 12;
const MOVIE_LIMIT: usize = 12;

/// Result category shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchCategory {
    #[default]
    All,
    Music,
    Movies,
}

impl std::str::FromStr for SearchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SearchCategory::All),
            "music" => Ok(SearchCategory::Music),
            "movies" => Ok(SearchCategory::Movies),
            _ => Err(format!("Unknown category: {} (expected all, music or movies)", s)),
        }
    }
}

/// Results committed for one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub music: Vec<MusicItem>,
    pub movies: Vec<Movie>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.music.is_empty() && self.movies.is_empty()
    }

    /// Items shown under `category`, music first
    pub fn items(&self, category: SearchCategory) -> Vec<ContentItem> {
        let music = self.music.iter().cloned().map(ContentItem::from);
        let movies = self.movies.iter().cloned().map(ContentItem::from);
        match category {
            SearchCategory::All => music.chain(movies).collect(),
            SearchCategory::Music => music.collect(),
            SearchCategory::Movies => movies.collect(),
        }
    }
}

/// What happened to one input
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank input; results were cleared
    Cleared,
    /// A newer input arrived before this one finished
    Superseded,
    Completed(SearchResults),
}

#[derive(Debug, Default)]
struct SearchState {
    category: SearchCategory,
    results: Option<SearchResults>,
}

pub struct SearchController {
    deezer: Arc<DeezerClient>,
    tmdb: Option<Arc<TmdbClient>>,
    debounce: Duration,
    sequence: RequestSequence,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(deezer: Arc<DeezerClient>, tmdb: Option<Arc<TmdbClient>>) -> Self {
        Self {
            deezer,
            tmdb,
            debounce: DEBOUNCE,
            sequence: RequestSequence::new(),
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn from_providers(providers: &Providers) -> Self {
        Self::new(providers.deezer.clone(), providers.tmdb.clone())
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Handle one input value
    pub async fn input(&self, raw: &str) -> SearchOutcome {
        let token = self.sequence.next();
        let query = raw.trim();

        if query.is_empty() {
            self.lock().results = None;
            return SearchOutcome::Cleared;
        }

        tokio::time::sleep(self.debounce).await;
        if !self.sequence.is_current(token) {
            debug!(query, token = token.value(), "Superseded during debounce");
            return SearchOutcome::Superseded;
        }

        let results = self.perform(query).await;
        self.commit(token, results)
    }

    /// Search immediately, without debounce; still latest-wins
    pub async fn search_now(&self, query: &str) -> SearchOutcome {
        let token = self.sequence.next();
        let query = query.trim();
        if query.is_empty() {
            self.lock().results = None;
            return SearchOutcome::Cleared;
        }
        let results = self.perform(query).await;
        self.commit(token, results)
    }

    async fn perform(&self, query: &str) -> SearchResults {
        let (music, movies) = tokio::join!(self.search_music(query), self.search_movies(query));
        SearchResults {
            query: query.to_string(),
            music,
            movies,
        }
    }

    fn commit(&self, token: RequestToken, results: SearchResults) -> SearchOutcome {
        let mut state = self.lock();
        // Check under the lock so a concurrent commit cannot interleave
        if !self.sequence.is_current(token) {
            debug!(query = %results.query, token = token.value(), "Superseded during fetch");
            return SearchOutcome::Superseded;
        }

        info!(
            query = %results.query,
            music = results.music.len(),
            movies = results.movies.len(),
            "Search complete"
        );
        state.results = Some(results.clone());
        SearchOutcome::Completed(results)
    }

    async fn search_music(&self, query: &str) -> Vec<MusicItem> {
        let (tracks, playlists) = tokio::join!(
            self.deezer.search_tracks(query, TRACK_LIMIT),
            self.deezer.search_playlists(query, PLAYLIST_LIMIT),
        );
        let mut music = tracks;
        music.extend(playlists);
        music.truncate(MUSIC_LIMIT);
        music
    }

    async fn search_movies(&self, query: &str) -> Vec<Movie> {
        match &self.tmdb {
            Some(tmdb) => tmdb.search_movies(query, MOVIE_LIMIT).await,
            None => {
                debug!("TMDB not configured, skipping movie search");
                Vec::new()
            }
        }
    }

    pub fn category(&self) -> SearchCategory {
        self.lock().category
    }

    pub fn set_category(&self, category: SearchCategory) {
        self.lock().category = category;
    }

    /// Last committed results
    pub fn committed(&self) -> Option<SearchResults> {
        self.lock().results.clone()
    }

    /// Committed results under the active category, music first
    pub fn results(&self) -> Vec<ContentItem> {
        let state = self.lock();
        state
            .results
            .as_ref()
            .map(|results| results.items(state.category))
            .unwrap_or_default()
    }

    /// Drop results and supersede anything in flight
    pub fn clear(&self) {
        self.sequence.invalidate();
        let mut state = self.lock();
        state.results = None;
        state.category = SearchCategory::All;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{DeezerConfig, StubHttpClient};
    use serde_json::json;

    fn controller(stub: StubHttpClient) -> SearchController {
        let deezer = DeezerClient::new(DeezerConfig::default(), Arc::new(stub)).unwrap();
        SearchController::new(Arc::new(deezer), None).with_debounce(Duration::from_millis(10))
    }

    fn tracks(ids: &[u64]) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({"id": id, "title": format!("Track {}", id)}))
            .collect();
        json!({ "data": data })
    }

    #[tokio::test]
    async fn test_blank_input_clears() {
        let c = controller(StubHttpClient::new());
        assert_eq!(c.input("   ").await, SearchOutcome::Cleared);
        assert!(c.results().is_empty());
    }

    #[tokio::test]
    async fn test_music_combined_and_truncated() {
        let stub = StubHttpClient::new()
            .respond("/search/track", tracks(&[1, 2, 3, 4, 5, 6, 7, 8]))
            .respond("/search/playlist", json!({"data": [
                {"id": 11}, {"id": 12}, {"id": 13}, {"id": 14}, {"id": 15}, {"id": 16}
            ]}));
        let c = controller(stub);

        match c.input("lofi").await {
            SearchOutcome::Completed(results) => {
                assert_eq!(results.music.len(), 12);
                assert!(results.movies.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_category_filter() {
        let c = controller(StubHttpClient::new().respond("/search/track", tracks(&[1])));
        c.input("rain").await;

        assert_eq!(c.results().len(), 1);
        c.set_category(SearchCategory::Movies);
        assert!(c.results().is_empty());
    }

    #[test]
    fn test_items_follow_category() {
        let results = SearchResults {
            query: "rain".to_string(),
            music: vec![crate::domain::content::fixtures::track("1")],
            movies: vec![crate::domain::content::fixtures::movie("2", None)],
        };
        assert_eq!(results.items(SearchCategory::All).len(), 2);
        assert!(matches!(
            results.items(SearchCategory::All)[0],
            ContentItem::Music(_)
        ));
        assert_eq!(results.items(SearchCategory::Movies).len(), 1);
        assert_eq!(results.items(SearchCategory::Music).len(), 1);
    }

    #[tokio::test]
    async fn test_superseded_during_debounce() {
        let c = Arc::new(controller(StubHttpClient::new().respond("/search/track", tracks(&[1]))));

        let first = {
            let c = c.clone();
            tokio::spawn(async move { c.input("fir").await })
        };
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        let second = c.input("first").await;

        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);
        assert!(matches!(second, SearchOutcome::Completed(_)));
        assert_eq!(c.committed().unwrap().query, "first");
    }

    #[tokio::test]
    async fn test_clear_supersedes_in_flight() {
        let stub = StubHttpClient::new().respond_after(
            "/search/track",
            tracks(&[1]),
            Duration::from_millis(50),
        );
        let c = Arc::new(controller(stub));

        let pending = {
            let c = c.clone();
            tokio::spawn(async move { c.search_now("late").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        c.clear();

        assert_eq!(pending.await.unwrap(), SearchOutcome::Superseded);
        assert!(c.committed().is_none());
    }
}
