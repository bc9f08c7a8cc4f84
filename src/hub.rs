//! Mood hub orchestration.
//!
//! A [`HubController`] loads music, movies and games for one mood
//! concurrently. Each section settles on its own: a slow or unconfigured
//! provider never blocks the others from rendering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, instrument, warn};

use crate::adapters::{
    DeezerClient, GamezopClient, HttpClient, MusicCategory, PuzzleCatalog, RawgClient, TmdbClient,
};
use crate::config::{ConfigError, ResolvedConfig};
use crate::core::collections::shuffled;
use crate::domain::{Game, Mood, Movie, MusicItem};
use crate::library::{Watchlist, WatchlistKind};
use crate::render::{html, GameRenderer, MovieRenderer, MusicRenderer, Renderer};

pub const MUSIC_PLAYLISTS: usize = 8;
pub const MUSIC_ALBUMS: usize = 4;
pub const MOVIE_LIMIT: usize = 12;
pub const GAME_LIMIT: usize = 12;

// ============================================================================
// Providers
// ============================================================================

/// Shared provider clients.
///
/// TMDB and RAWG need API keys; without one the client is absent and the
/// matching hub section renders as an error.
#[derive(Clone)]
pub struct Providers {
    pub deezer: Arc<DeezerClient>,
    pub tmdb: Option<Arc<TmdbClient>>,
    pub rawg: Option<Arc<RawgClient>>,
    pub gamezop: Arc<GamezopClient>,
    pub puzzles: Arc<PuzzleCatalog>,
}

impl Providers {
    /// Build every client from resolved configuration.
    ///
    /// Missing API keys disable that provider with a warning; invalid base
    /// URLs are errors.
    pub fn from_config(
        config: &ResolvedConfig,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self, ConfigError> {
        let tmdb = optional(TmdbClient::new(config.tmdb(), http.clone()))?;
        let rawg = optional(RawgClient::new(config.rawg(), http.clone()))?;

        Ok(Self {
            deezer: Arc::new(DeezerClient::new(config.deezer(), http.clone())?),
            tmdb: tmdb.map(Arc::new),
            rawg: rawg.map(Arc::new),
            gamezop: Arc::new(GamezopClient::new(config.gamezop(), http)?),
            puzzles: Arc::new(PuzzleCatalog::new()),
        })
    }

    /// Empty every provider cache
    pub fn clear_caches(&self) {
        self.deezer.clear_cache();
        if let Some(tmdb) = &self.tmdb {
            tmdb.clear_cache();
        }
        if let Some(rawg) = &self.rawg {
            rawg.clear_cache();
        }
        self.gamezop.clear_cache();
        self.puzzles.clear_cache();
    }
}

fn optional<T>(client: Result<T, ConfigError>) -> Result<Option<T>, ConfigError> {
    match client {
        Ok(client) => Ok(Some(client)),
        Err(ConfigError::MissingApiKey { provider, env_var }) => {
            warn!(provider, env_var, "API key not set, provider disabled");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Section state
// ============================================================================

/// Outcome of loading one hub section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Loaded(Vec<T>),
    Empty,
    Error(String),
}

impl<T> SectionState<T> {
    fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            SectionState::Empty
        } else {
            SectionState::Loaded(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            SectionState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SectionState::Error(_))
    }
}

fn render_section<R: Renderer>(renderer: &R, state: Option<&SectionState<R::Item>>) -> String {
    match state {
        None => renderer.render_loading_state(),
        Some(SectionState::Loaded(items)) => renderer.render(items),
        Some(SectionState::Empty) => renderer.render_empty_state(),
        Some(SectionState::Error(message)) => renderer.render_error_state(message),
    }
}

/// All three sections of a loaded hub
#[derive(Debug, Clone, PartialEq)]
pub struct HubContent {
    pub music: SectionState<MusicItem>,
    pub movies: SectionState<Movie>,
    pub games: SectionState<Game>,
}

/// Which sections the page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HubFilter {
    #[default]
    All,
    Music,
    Movies,
    Games,
}

impl HubFilter {
    pub const ALL: [HubFilter; 4] = [
        HubFilter::All,
        HubFilter::Music,
        HubFilter::Movies,
        HubFilter::Games,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HubFilter::All => "all",
            HubFilter::Music => "music",
            HubFilter::Movies => "movies",
            HubFilter::Games => "games",
        }
    }

    /// Whether the section `category` is visible under this filter
    pub fn shows(&self, category: HubFilter) -> bool {
        *self == HubFilter::All || *self == category
    }
}

impl std::str::FromStr for HubFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(HubFilter::All),
            "music" => Ok(HubFilter::Music),
            "movies" => Ok(HubFilter::Movies),
            "games" => Ok(HubFilter::Games),
            _ => Err(format!("Unknown filter: {} (expected all, music, movies or games)", s)),
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Default)]
struct ContentCache {
    music: HashMap<Mood, Vec<MusicItem>>,
    movies: HashMap<Mood, Vec<Movie>>,
    games: HashMap<Mood, Vec<Game>>,
}

/// Per-mood hub page controller
pub struct HubController {
    mood: Mood,
    filter: HubFilter,
    providers: Providers,
    cache: Mutex<ContentCache>,
    content: Mutex<Option<HubContent>>,
}

impl HubController {
    pub fn new(mood: Mood, providers: Providers) -> Self {
        Self {
            mood,
            filter: HubFilter::All,
            providers,
            cache: Mutex::new(ContentCache::default()),
            content: Mutex::new(None),
        }
    }

    /// Controller for a user-supplied mood label; unknown labels log and yield `None`
    pub fn for_label(label: &str, providers: Providers) -> Option<Self> {
        Mood::from_label(label).map(|mood| Self::new(mood, providers))
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn filter(&self) -> HubFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: HubFilter) {
        self.filter = filter;
    }

    /// Switch hubs; cached sections of other moods are kept
    pub fn set_mood(&mut self, mood: Mood) {
        if mood != self.mood {
            self.mood = mood;
            *self.content.lock().unwrap_or_else(|e| e.into_inner()) = None;
        }
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Most recently loaded content, if any
    pub fn content(&self) -> Option<HubContent> {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Load all three sections concurrently
    #[instrument(skip(self), fields(mood = %self.mood))]
    pub async fn load_content(&self) -> HubContent {
        let (music, movies, games) =
            tokio::join!(self.load_music(), self.load_movies(), self.load_games());

        info!(
            music = music.items().len(),
            movies = movies.items().len(),
            games = games.items().len(),
            "Hub content loaded"
        );

        let content = HubContent {
            music,
            movies,
            games,
        };
        *self.content.lock().unwrap_or_else(|e| e.into_inner()) = Some(content.clone());
        content
    }

    /// Drop every cache and load again
    pub async fn refresh(&self) -> HubContent {
        self.providers.clear_caches();
        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = ContentCache::default();
        info!(mood = %self.mood, "Hub caches cleared");
        self.load_content().await
    }

    async fn load_music(&self) -> SectionState<MusicItem> {
        if let Some(cached) = self.cached(|c| c.music.get(&self.mood).cloned()) {
            return SectionState::Loaded(cached);
        }

        let deezer = &self.providers.deezer;
        let (playlists, albums) = tokio::join!(
            deezer.get_mood_content(self.mood, MusicCategory::Playlists, MUSIC_PLAYLISTS),
            deezer.get_mood_content(self.mood, MusicCategory::Albums, MUSIC_ALBUMS),
        );

        let mut combined = playlists;
        combined.extend(albums);
        let music = shuffled(combined);

        if !music.is_empty() {
            self.store(|c| {
                c.music.insert(self.mood, music.clone());
            });
        }
        SectionState::from_items(music)
    }

    async fn load_movies(&self) -> SectionState<Movie> {
        let Some(tmdb) = &self.providers.tmdb else {
            return SectionState::Error(
                "Movies are unavailable: set TMDB_API_KEY to enable TMDB.".to_string(),
            );
        };
        if let Some(cached) = self.cached(|c| c.movies.get(&self.mood).cloned()) {
            return SectionState::Loaded(cached);
        }

        let movies = tmdb.get_mood_movies(self.mood, MOVIE_LIMIT).await;
        if !movies.is_empty() {
            self.store(|c| {
                c.movies.insert(self.mood, movies.clone());
            });
        }
        SectionState::from_items(movies)
    }

    async fn load_games(&self) -> SectionState<Game> {
        let Some(rawg) = &self.providers.rawg else {
            return SectionState::Error(
                "Games are unavailable: set RAWG_API_KEY to enable RAWG.".to_string(),
            );
        };
        if let Some(cached) = self.cached(|c| c.games.get(&self.mood).cloned()) {
            return SectionState::Loaded(cached);
        }

        let games = rawg.get_mood_games(self.mood, GAME_LIMIT).await;
        if !games.is_empty() {
            self.store(|c| {
                c.games.insert(self.mood, games.clone());
            });
        }
        SectionState::from_items(games)
    }

    fn cached<T>(&self, f: impl FnOnce(&ContentCache) -> Option<T>) -> Option<T> {
        f(&self.cache.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn store(&self, f: impl FnOnce(&mut ContentCache)) {
        f(&mut self.cache.lock().unwrap_or_else(|e| e.into_inner()))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Full hub page from the last loaded content
    pub fn render_page(&self, watchlist: &Watchlist) -> String {
        let content = self.content();
        let music = MusicRenderer::new().with_favorites(watchlist.ids(WatchlistKind::Music));
        let movies = MovieRenderer::new().with_watchlist(watchlist.ids(WatchlistKind::Movies));
        let games = GameRenderer::new()
            .with_mood(self.mood)
            .with_favorites(watchlist.ids(WatchlistKind::Games));

        let sections = [
            (
                HubFilter::Music,
                "Music",
                render_section(&music, content.as_ref().map(|c| &c.music)),
            ),
            (
                HubFilter::Movies,
                "Movies",
                render_section(&movies, content.as_ref().map(|c| &c.movies)),
            ),
            (
                HubFilter::Games,
                "Games",
                render_section(&games, content.as_ref().map(|c| &c.games)),
            ),
        ];

        let filters: Vec<String> = HubFilter::ALL
            .iter()
            .map(|f| {
                let active = *f == self.filter;
                format!(
                    r#"<button class="filter-nav__btn{}" data-filter="{}" aria-pressed="{}">{}</button>"#,
                    if active { " filter-nav__btn--active" } else { "" },
                    f.as_str(),
                    active,
                    capitalize(f.as_str())
                )
            })
            .collect();

        let body: Vec<String> = sections
            .into_iter()
            .map(|(category, heading, inner)| {
                let hidden = if self.filter.shows(category) { "" } else { " hidden" };
                format!(
                    "<div class=\"content-section\" data-category=\"{}\"{}>\n{}\n</div>",
                    category.as_str(),
                    hidden,
                    html::section(category.as_str(), heading, &inner)
                )
            })
            .collect();

        let main = format!(
            "<header class=\"hub-header\"><h1>{} Hub</h1></header>\n<nav class=\"filter-nav\">\n{}\n</nav>\n{}",
            self.mood.label(),
            filters.join("\n"),
            body.join("\n")
        );
        html::page(self.mood.label(), Some(self.mood), &main)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
