//! RAWG games client.
//!
//! Mood results are cached per `games_{mood}_{limit}` on top of the URL
//! cache, and details per `game_details_{id}`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{parse_base_url, CachedFetcher, HttpClient, ProviderError, DEFAULT_TIMEOUT};
use crate::config::ConfigError;
use crate::core::collections::{dedup_by_key, truncate_text};
use crate::core::TtlCache;
use crate::domain::queries::game_queries;
use crate::domain::{Game, GameSource, Mood};

pub const PROVIDER: &str = "rawg";

pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// RAWG platform id for web browsers
const WEB_PLATFORM: &str = "171";

/// Only well-reviewed games
const METACRITIC_RANGE: &str = "60,100";

#[derive(Debug, Clone)]
pub struct RawgConfig {
    /// Required; construction fails without it
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RawgConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RawgConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }
}

// ============================================================================
// Response payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlatformEntry {
    platform: Named,
}

#[derive(Debug, Deserialize)]
struct Screenshot {
    image: String,
}

#[derive(Debug, Deserialize)]
struct GamePayload {
    id: u64,
    name: Option<String>,
    slug: Option<String>,
    background_image: Option<String>,
    rating: Option<f64>,
    ratings_count: Option<u64>,
    metacritic: Option<u32>,
    released: Option<String>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    tags: Vec<Named>,
    #[serde(default)]
    platforms: Option<Vec<PlatformEntry>>,
    playtime: Option<u32>,
    esrb_rating: Option<Named>,
    description_raw: Option<String>,
    #[serde(default)]
    short_screenshots: Vec<Screenshot>,
}

#[derive(Debug, Deserialize)]
struct GamesPage {
    #[serde(default)]
    results: Vec<GamePayload>,
}

#[derive(Debug, Deserialize)]
struct DetailsPayload {
    id: u64,
    name: Option<String>,
    description_raw: Option<String>,
    background_image: Option<String>,
    rating: Option<f64>,
    metacritic: Option<u32>,
    released: Option<String>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    tags: Vec<Named>,
    #[serde(default)]
    developers: Vec<Named>,
    #[serde(default)]
    publishers: Vec<Named>,
    website: Option<String>,
    reddit_url: Option<String>,
    playtime: Option<u32>,
    esrb_rating: Option<Named>,
}

/// Expanded RAWG record for the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub rating: f64,
    pub metacritic: Option<u32>,
    pub released: Option<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub website: String,
    pub reddit: String,
    pub playtime: Option<u32>,
    pub esrb_rating: String,
}

fn names(list: Vec<Named>) -> Vec<String> {
    list.into_iter().map(|n| n.name).collect()
}

fn esrb(rating: Option<Named>) -> String {
    rating
        .map(|r| r.name)
        .unwrap_or_else(|| "Not Rated".to_string())
}

fn transform_game(g: GamePayload, mood: Mood) -> Game {
    let genres = names(g.genres);
    let short_description = match g.description_raw.as_deref().filter(|d| !d.is_empty()) {
        Some(d) => truncate_text(d, 120),
        None => format!("A {} game", genres.join(", ")),
    };
    let slug = g.slug.filter(|s| !s.is_empty());

    Game {
        id: g.id.to_string(),
        source: GameSource::Rawg,
        title: g.name.unwrap_or_else(|| "Untitled".to_string()),
        image: g.background_image.filter(|s| !s.is_empty()),
        rating: g.rating.unwrap_or(0.0),
        rating_count: g.ratings_count.unwrap_or(0),
        metacritic: g.metacritic,
        released: g.released.filter(|s| !s.is_empty()),
        tags: g.tags.into_iter().take(5).map(|t| t.name).collect(),
        platforms: g
            .platforms
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.platform.name)
            .collect(),
        genres,
        categories: Vec::new(),
        playtime: g.playtime,
        esrb_rating: esrb(g.esrb_rating),
        short_description,
        link: match &slug {
            Some(s) => format!("https://rawg.io/games/{}", s),
            None => format!("https://rawg.io/games/{}", g.id),
        },
        slug,
        difficulty: None,
        duration: None,
        plays: None,
        screenshots: g.short_screenshots.into_iter().take(4).map(|s| s.image).collect(),
        mood: Some(mood),
    }
}

// ============================================================================
// Client
// ============================================================================

/// RAWG client filtered to browser-playable, well-rated games
pub struct RawgClient {
    fetcher: CachedFetcher,
    api_key: String,
    mood_games: TtlCache<Vec<Game>>,
    details: TtlCache<GameDetails>,
}

impl RawgClient {
    pub fn new(config: RawgConfig, http: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                provider: PROVIDER,
                env_var: "RAWG_API_KEY",
            })?;
        let base_url = parse_base_url(PROVIDER, &config.base_url)?;

        Ok(Self {
            fetcher: CachedFetcher::new(PROVIDER, http, base_url, config.timeout, CACHE_TTL),
            api_key,
            mood_games: TtlCache::new(CACHE_TTL),
            details: TtlCache::new(CACHE_TTL),
        })
    }

    async fn try_mood_games(&self, mood: Mood, limit: usize) -> Result<Vec<Game>, ProviderError> {
        let q = game_queries(mood);
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("page_size", limit.to_string()),
            ("ordering", q.sort_by.to_string()),
            ("tags", q.tags.join(",")),
            ("genres", q.genres.join(",")),
            ("platforms", WEB_PLATFORM.to_string()),
            ("metacritic", METACRITIC_RANGE.to_string()),
        ];
        if !q.exclude_tags.is_empty() {
            params.push(("exclude_tags", q.exclude_tags.join(",")));
        }

        let page: GamesPage = self.fetcher.fetch_as("/games", &params).await?;
        let games: Vec<Game> = page
            .results
            .into_iter()
            .map(|g| transform_game(g, mood))
            .collect();
        let mut games = dedup_by_key(games, |g| g.id.clone());
        games.truncate(limit);
        Ok(games)
    }

    /// Browser-playable games for a mood, in RAWG's ordering.
    ///
    /// Any failure returns the mood's single fallback game.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn get_mood_games(&self, mood: Mood, limit: usize) -> Vec<Game> {
        let key = format!("games_{}_{}", mood, limit);
        if let Some(cached) = self.mood_games.get(&key) {
            return cached;
        }

        match self.try_mood_games(mood, limit).await {
            Ok(games) => {
                info!(%mood, count = games.len(), "Loaded mood games");
                self.mood_games.insert(key, games.clone());
                games
            }
            Err(e) => {
                warn!(error = %e, %mood, "RAWG request failed, using fallback");
                fallback_games(mood)
            }
        }
    }

    /// Expanded details, cached per id
    pub async fn game_details(&self, id: &str) -> Result<GameDetails, ProviderError> {
        let key = format!("game_details_{}", id);
        if let Some(cached) = self.details.get(&key) {
            return Ok(cached);
        }

        let endpoint = format!("/games/{}", id);
        let d: DetailsPayload = self
            .fetcher
            .fetch_as(&endpoint, &[("key", self.api_key.clone())])
            .await?;

        let details = GameDetails {
            id: d.id.to_string(),
            title: d.name.unwrap_or_else(|| "Untitled".to_string()),
            description: d.description_raw.unwrap_or_default(),
            image: d.background_image,
            rating: d.rating.unwrap_or(0.0),
            metacritic: d.metacritic,
            released: d.released,
            genres: names(d.genres),
            tags: names(d.tags),
            developers: names(d.developers),
            publishers: names(d.publishers),
            website: d.website.unwrap_or_default(),
            reddit: d.reddit_url.unwrap_or_default(),
            playtime: d.playtime,
            esrb_rating: esrb(d.esrb_rating),
        };

        self.details.insert(key, details.clone());
        Ok(details)
    }

    pub fn clear_cache(&self) {
        self.fetcher.clear_cache();
        self.mood_games.clear();
        self.details.clear();
        info!("RAWG cache cleared");
    }
}

struct FallbackGame {
    id: &'static str,
    title: &'static str,
    image: &'static str,
    rating: f64,
    genres: &'static [&'static str],
    tags: &'static [&'static str],
    description: &'static str,
    link: &'static str,
}

fn fallback_entry(mood: Mood) -> FallbackGame {
    match mood {
        Mood::Focus => FallbackGame {
            id: "fallback-1",
            title: "2048",
            image: "https://play-lh.googleusercontent.com/EYlqDYgeVBZZCn30xg7KOZhf5pNc2jROxMh5lrFVjCRx6pIuB7T0uFt3RpPdFT7iXPg",
            rating: 4.2,
            genres: &["Puzzle"],
            tags: &["Logic", "Minimalist", "Addictive"],
            description: "Combine numbered tiles to reach 2048",
            link: "https://play2048.co/",
        },
        Mood::Relax => FallbackGame {
            id: "fallback-2",
            title: "Little Alchemy 2",
            image: "https://littlealchemy2.com/static/img/largeicon.jpg",
            rating: 4.5,
            genres: &["Casual", "Puzzle"],
            tags: &["Relaxing", "Creative", "Discovery"],
            description: "Combine elements to discover new items",
            link: "https://littlealchemy2.com/",
        },
        Mood::Energize => FallbackGame {
            id: "fallback-3",
            title: "Slope",
            image: "https://img.poki.com/cdn-cgi/image/quality=78,width=600,height=600,fit=cover,f=auto/d471ea2d-3a7c-4fc5-b95f-e7b2bd1ab5d1.png",
            rating: 4.3,
            genres: &["Action", "Arcade"],
            tags: &["Fast-Paced", "Challenging", "Reflexes"],
            description: "Navigate a ball down an endless slope",
            link: "https://www.crazygames.com/game/slope",
        },
        Mood::Creative => FallbackGame {
            id: "fallback-4",
            title: "Townscaper",
            image: "https://cdn.cloudflare.steamstatic.com/steam/apps/1291340/header.jpg",
            rating: 4.7,
            genres: &["Casual", "Simulation"],
            tags: &["Building", "Relaxing", "Creative"],
            description: "Build peaceful island towns with simple clicks",
            link: "https://store.steampowered.com/app/1291340/Townscaper/",
        },
        Mood::Melancholy => FallbackGame {
            id: "fallback-5",
            title: "A Short Hike",
            image: "https://cdn.cloudflare.steamstatic.com/steam/apps/1055540/header.jpg",
            rating: 4.8,
            genres: &["Adventure", "Indie"],
            tags: &["Exploration", "Relaxing", "Atmospheric"],
            description: "Explore a peaceful mountain park",
            link: "https://store.steampowered.com/app/1055540/A_Short_Hike/",
        },
    }
}

/// Hand-picked game per mood for when RAWG is unreachable
pub fn fallback_games(mood: Mood) -> Vec<Game> {
    let f = fallback_entry(mood);
    let to_strings = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    vec![Game {
        id: f.id.to_string(),
        source: GameSource::Rawg,
        title: f.title.to_string(),
        image: Some(f.image.to_string()),
        rating: f.rating,
        rating_count: 0,
        metacritic: None,
        released: None,
        genres: to_strings(f.genres),
        tags: to_strings(f.tags),
        platforms: vec!["Web".to_string()],
        categories: Vec::new(),
        playtime: None,
        esrb_rating: "Not Rated".to_string(),
        short_description: f.description.to_string(),
        link: f.link.to_string(),
        slug: None,
        difficulty: None,
        duration: None,
        plays: None,
        screenshots: Vec::new(),
        mood: Some(mood),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StubHttpClient;
    use serde_json::json;

    fn client(stub: Arc<StubHttpClient>) -> RawgClient {
        RawgClient::new(RawgConfig::with_api_key("k"), stub).unwrap()
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(
            RawgClient::new(RawgConfig::default(), Arc::new(StubHttpClient::new())),
            Err(ConfigError::MissingApiKey { provider: "rawg", .. })
        ));
    }

    #[tokio::test]
    async fn test_mood_games_params_and_transform() {
        let body = json!({"results": [{
            "id": 3328, "name": "Portal", "slug": "portal",
            "rating": 4.5, "metacritic": 90, "released": "2007-10-09",
            "genres": [{"name": "Puzzle"}],
            "tags": [{"name": "a"}, {"name": "b"}, {"name": "c"}, {"name": "d"}, {"name": "e"}, {"name": "f"}],
            "platforms": [{"platform": {"name": "PC"}}]
        }]});
        let stub = Arc::new(StubHttpClient::new().respond("/games", body));
        let c = client(stub.clone());

        let games = c.get_mood_games(Mood::Focus, 12).await;
        assert_eq!(games.len(), 1);
        let g = &games[0];
        assert_eq!(g.link, "https://rawg.io/games/portal");
        assert_eq!(g.tags.len(), 5);
        assert_eq!(g.esrb_rating, "Not Rated");
        assert_eq!(g.short_description, "A Puzzle game");

        let url = &stub.requested()[0];
        assert!(url.contains("platforms=171"));
        assert!(url.contains("metacritic=60%2C100"));
        assert!(url.contains("exclude_tags="));

        // Second call served from the mood cache
        c.get_mood_games(Mood::Focus, 12).await;
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_error() {
        let c = client(Arc::new(StubHttpClient::new()));
        let games = c.get_mood_games(Mood::Creative, 12).await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Townscaper");
        assert_eq!(games[0].mood, Some(Mood::Creative));
    }

    #[tokio::test]
    async fn test_details_cached() {
        let stub = Arc::new(StubHttpClient::new().respond(
            "/games/42",
            json!({"id": 42, "name": "Celeste", "developers": [{"name": "Maddy Makes Games"}]}),
        ));
        let c = client(stub.clone());

        let d = c.game_details("42").await.unwrap();
        assert_eq!(d.developers, vec!["Maddy Makes Games".to_string()]);
        assert_eq!(d.esrb_rating, "Not Rated");
        c.game_details("42").await.unwrap();
        assert_eq!(stub.calls(), 1);
    }
}
