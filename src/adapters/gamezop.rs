//! Gamezop HTML5 games client.
//!
//! The full catalog is fetched once and cached as `gamezop_all_games`; mood
//! filtering happens locally. Any failure falls back to a built-in catalog.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use super::{parse_base_url, CachedFetcher, HttpClient, ProviderError, DEFAULT_TIMEOUT};
use crate::config::ConfigError;
use crate::core::collections::{dedup_by_key, shuffle_take, shuffled};
use crate::core::TtlCache;
use crate::domain::queries::game_queries;
use crate::domain::{Game, GameSource, Mood};

pub const PROVIDER: &str = "gamezop";

pub const DEFAULT_BASE_URL: &str = "https://www.gamezop.com/api/v1";

pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

const CATALOG_KEY: &str = "gamezop_all_games";

/// Description words promoted to tags
const TAG_KEYWORDS: [&str; 6] = ["puzzle", "action", "strategy", "casual", "arcade", "adventure"];

#[derive(Debug, Clone)]
pub struct GamezopConfig {
    /// Partner id appended to game URLs when set
    pub partner_id: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GamezopConfig {
    fn default() -> Self {
        Self {
            partner_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Assets {
    cover: Option<String>,
    #[serde(rename = "coverLandscape")]
    cover_landscape: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GamePayload {
    id: Option<String>,
    code: Option<String>,
    name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    assets: Option<Assets>,
    thumbnail: Option<String>,
    cover: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    rating: Option<f64>,
    game_plays: Option<u64>,
    game_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    games: Vec<GamePayload>,
}

/// Categories, game type and description keywords, deduplicated in order
fn extract_tags(categories: &[String], game_type: Option<&str>, description: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = categories.to_vec();
    if let Some(t) = game_type {
        tags.push(t.to_string());
    }
    if let Some(d) = description {
        let lower = d.to_lowercase();
        tags.extend(
            TAG_KEYWORDS
                .iter()
                .filter(|k| lower.contains(*k))
                .map(|k| k.to_string()),
        );
    }
    dedup_by_key(tags, |t| t.clone())
}

fn lower_categories(categories: &[String]) -> Vec<String> {
    categories.iter().map(|c| c.to_lowercase()).collect()
}

/// puzzle/strategy → medium, casual → easy, action/arcade → hard
pub fn difficulty_for(categories: &[String]) -> &'static str {
    let c = lower_categories(categories);
    let has = |name: &str| c.iter().any(|x| x == name);
    if has("puzzle") || has("strategy") {
        "medium"
    } else if has("casual") {
        "easy"
    } else if has("action") || has("arcade") {
        "hard"
    } else {
        "easy"
    }
}

/// Rough session length by category
pub fn duration_for(categories: &[String]) -> &'static str {
    let c = lower_categories(categories);
    let has = |name: &str| c.iter().any(|x| x == name);
    if has("puzzle") {
        "5-15 min"
    } else if has("strategy") {
        "10-20 min"
    } else if has("arcade") {
        "2-5 min"
    } else if has("casual") {
        "3-10 min"
    } else {
        "5-10 min"
    }
}

/// Gamezop catalog client
pub struct GamezopClient {
    fetcher: CachedFetcher,
    partner_id: Option<String>,
    catalog: TtlCache<Vec<Game>>,
}

impl GamezopClient {
    pub fn new(config: GamezopConfig, http: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(PROVIDER, &config.base_url)?;
        Ok(Self {
            fetcher: CachedFetcher::new(PROVIDER, http, base_url, config.timeout, CACHE_TTL),
            partner_id: config.partner_id.filter(|p| !p.trim().is_empty()),
            catalog: TtlCache::new(CACHE_TTL),
        })
    }

    /// Playable URL, carrying the partner id when configured
    pub fn game_url(&self, id: &str) -> String {
        match &self.partner_id {
            Some(partner) => format!("https://www.gamezop.com/games/{}?partner={}", id, partner),
            None => format!("https://www.gamezop.com/games/{}", id),
        }
    }

    fn format_game(&self, g: GamePayload) -> Option<Game> {
        let id = g.id.or(g.code).filter(|s| !s.is_empty())?;
        let tags = extract_tags(&g.categories, g.game_type.as_deref(), g.description.as_deref());
        let image = g
            .assets
            .as_ref()
            .and_then(|a| a.cover.clone())
            .or(g.thumbnail)
            .or_else(|| g.assets.as_ref().and_then(|a| a.cover_landscape.clone()))
            .or(g.cover);

        Some(Game {
            link: self.game_url(&id),
            title: g.name.or(g.title).unwrap_or_else(|| "Untitled".to_string()),
            short_description: g
                .description
                .unwrap_or_else(|| "Play this exciting game".to_string()),
            image,
            rating: g.rating.unwrap_or(4.0),
            rating_count: 0,
            metacritic: None,
            released: None,
            genres: g.game_type.into_iter().collect(),
            tags,
            platforms: vec!["Web".to_string()],
            difficulty: Some(difficulty_for(&g.categories).to_string()),
            duration: Some(duration_for(&g.categories).to_string()),
            categories: g.categories,
            playtime: None,
            esrb_rating: "Not Rated".to_string(),
            slug: Some(id.clone()),
            plays: Some(g.game_plays.unwrap_or(0)),
            screenshots: Vec::new(),
            mood: None,
            source: GameSource::Gamezop,
            id,
        })
    }

    async fn try_fetch_games(&self) -> Result<Vec<Game>, ProviderError> {
        let response: CatalogResponse = self.fetcher.fetch_as("/games", &[]).await?;
        Ok(response
            .games
            .into_iter()
            .filter_map(|g| self.format_game(g))
            .collect())
    }

    /// Whole catalog; the built-in list on any error
    pub async fn fetch_games(&self) -> Vec<Game> {
        if let Some(cached) = self.catalog.get(CATALOG_KEY) {
            return cached;
        }

        match self.try_fetch_games().await {
            Ok(games) => {
                info!(count = games.len(), "Loaded Gamezop catalog");
                self.catalog.insert(CATALOG_KEY, games.clone());
                games
            }
            Err(e) => {
                warn!(error = %e, "Using fallback Gamezop catalog");
                fallback_catalog()
            }
        }
    }

    /// Games matching the mood by tag, category or difficulty.
    ///
    /// With no matches the whole catalog is used instead.
    pub async fn get_mood_games(&self, mood: Mood, limit: usize) -> Vec<Game> {
        let all = self.fetch_games().await;
        let criteria = game_queries(mood);

        let matches = |game: &Game| {
            let tag_match = criteria.tags.iter().any(|t| {
                let t = t.to_lowercase();
                game.tags.iter().any(|g| g.to_lowercase().contains(&t))
            });
            let category_match = criteria.categories.iter().any(|c| {
                let c = c.to_lowercase();
                game.categories.iter().any(|g| g.to_lowercase().contains(&c))
            });
            let difficulty_match = match criteria.difficulty {
                None => true,
                Some(d) => game.difficulty.as_deref() == Some(d),
            };
            tag_match || category_match || difficulty_match
        };

        let mut filtered: Vec<Game> = all.iter().filter(|g| matches(g)).cloned().collect();
        if filtered.is_empty() {
            warn!(%mood, "No Gamezop games matched, using random games");
            filtered = shuffled(all);
        }

        shuffle_take(filtered, limit)
            .into_iter()
            .map(|mut g| {
                g.mood = Some(mood);
                g
            })
            .collect()
    }

    pub fn clear_cache(&self) {
        self.fetcher.clear_cache();
        self.catalog.clear();
        info!("Gamezop cache cleared");
    }
}

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    categories: &'static [&'static str],
    tags: &'static [&'static str],
    rating: f64,
    plays: u64,
    difficulty: &'static str,
    duration: &'static str,
    game_type: &'static str,
}

const FALLBACK_CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        id: "bubble-shooter",
        title: "Bubble Shooter",
        description: "Pop bubbles and clear the board in this classic puzzle game",
        categories: &["puzzle", "casual"],
        tags: &["puzzle", "relaxing", "casual"],
        rating: 4.5,
        plays: 15000,
        difficulty: "easy",
        duration: "5-10 min",
        game_type: "puzzle",
    },
    CatalogEntry {
        id: "tetris-classic",
        title: "Block Puzzle",
        description: "Arrange falling blocks in this timeless puzzle game",
        categories: &["puzzle", "strategy"],
        tags: &["puzzle", "focus", "strategy"],
        rating: 4.8,
        plays: 25000,
        difficulty: "medium",
        duration: "10-15 min",
        game_type: "puzzle",
    },
    CatalogEntry {
        id: "memory-match",
        title: "Memory Match",
        description: "Test your memory by matching pairs of cards",
        categories: &["puzzle", "memory"],
        tags: &["memory", "focus", "casual"],
        rating: 4.3,
        plays: 12000,
        difficulty: "easy",
        duration: "3-8 min",
        game_type: "puzzle",
    },
    CatalogEntry {
        id: "space-invaders",
        title: "Space Shooter",
        description: "Defend Earth from alien invaders in this classic arcade game",
        categories: &["action", "arcade"],
        tags: &["action", "energize", "arcade"],
        rating: 4.6,
        plays: 30000,
        difficulty: "medium",
        duration: "5-10 min",
        game_type: "action",
    },
    CatalogEntry {
        id: "zen-garden",
        title: "Zen Garden",
        description: "Create your peaceful zen garden in this relaxing game",
        categories: &["casual", "creative"],
        tags: &["relaxing", "creative", "zen"],
        rating: 4.7,
        plays: 8000,
        difficulty: "easy",
        duration: "10-20 min",
        game_type: "casual",
    },
    CatalogEntry {
        id: "word-search",
        title: "Word Quest",
        description: "Find hidden words in this engaging word puzzle",
        categories: &["puzzle", "word"],
        tags: &["puzzle", "focus", "word"],
        rating: 4.4,
        plays: 18000,
        difficulty: "medium",
        duration: "8-15 min",
        game_type: "puzzle",
    },
    CatalogEntry {
        id: "rhythm-master",
        title: "Rhythm Master",
        description: "Hit the beats and create music in this rhythm game",
        categories: &["music", "rhythm"],
        tags: &["creative", "music", "energize"],
        rating: 4.9,
        plays: 35000,
        difficulty: "medium",
        duration: "3-5 min",
        game_type: "rhythm",
    },
    CatalogEntry {
        id: "color-flow",
        title: "Color Flow",
        description: "Connect matching colors in this relaxing puzzle game",
        categories: &["puzzle", "casual"],
        tags: &["puzzle", "relaxing", "creative"],
        rating: 4.5,
        plays: 22000,
        difficulty: "easy",
        duration: "5-12 min",
        game_type: "puzzle",
    },
];

/// Built-in catalog used when the Gamezop API is unavailable
pub fn fallback_catalog() -> Vec<Game> {
    let strings = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    FALLBACK_CATALOG
        .iter()
        .map(|e| Game {
            id: e.id.to_string(),
            source: GameSource::Gamezop,
            title: e.title.to_string(),
            image: None,
            rating: e.rating,
            rating_count: 0,
            metacritic: None,
            released: None,
            genres: vec![e.game_type.to_string()],
            tags: strings(e.tags),
            platforms: vec!["Web".to_string()],
            categories: strings(e.categories),
            playtime: None,
            esrb_rating: "Not Rated".to_string(),
            short_description: e.description.to_string(),
            link: "#".to_string(),
            slug: Some(e.id.to_string()),
            difficulty: Some(e.difficulty.to_string()),
            duration: Some(e.duration.to_string()),
            plays: Some(e.plays),
            screenshots: Vec::new(),
            mood: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StubHttpClient;
    use serde_json::json;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_difficulty_and_duration() {
        assert_eq!(difficulty_for(&strings(&["Puzzle", "casual"])), "medium");
        assert_eq!(difficulty_for(&strings(&["casual"])), "easy");
        assert_eq!(difficulty_for(&strings(&["arcade"])), "hard");
        assert_eq!(difficulty_for(&[]), "easy");
        assert_eq!(duration_for(&strings(&["strategy"])), "10-20 min");
        assert_eq!(duration_for(&strings(&["music"])), "5-10 min");
    }

    #[test]
    fn test_extract_tags_dedups() {
        let tags = extract_tags(
            &strings(&["puzzle"]),
            Some("arcade"),
            Some("A casual PUZZLE with arcade flair"),
        );
        assert_eq!(tags, strings(&["puzzle", "arcade", "casual"]));
    }

    #[test]
    fn test_game_url_partner() {
        let c = GamezopClient::new(
            GamezopConfig {
                partner_id: Some("p123".into()),
                ..Default::default()
            },
            Arc::new(StubHttpClient::new()),
        )
        .unwrap();
        assert_eq!(c.game_url("abc"), "https://www.gamezop.com/games/abc?partner=p123");
    }

    #[tokio::test]
    async fn test_fallback_catalog_on_error() {
        let c = GamezopClient::new(GamezopConfig::default(), Arc::new(StubHttpClient::new())).unwrap();
        let games = c.fetch_games().await;
        assert_eq!(games.len(), 8);
    }

    #[tokio::test]
    async fn test_mood_filter() {
        let body = json!({"games": [
            {"code": "a1", "name": "Chess Blitz", "categories": ["strategy"]},
            {"code": "b2", "name": "Racer", "categories": ["racing"], "gameType": "action"}
        ]});
        let c = GamezopClient::new(
            GamezopConfig::default(),
            Arc::new(StubHttpClient::new().respond("/games", body)),
        )
        .unwrap();

        // Focus matches the strategy category (and medium difficulty)
        let games = c.get_mood_games(Mood::Focus, 12).await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "a1");
        assert_eq!(games[0].mood, Some(Mood::Focus));
    }
}
