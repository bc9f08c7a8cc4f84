//! Normalized content items.
//!
//! Every provider converts its payloads into one of the [`ContentItem`]
//! variants. Renderers, the hub and the watchlist only ever see these types.

use serde::{Deserialize, Serialize};

use super::mood::Mood;

/// Kind of Deezer item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicKind {
    Track,
    Playlist,
    Album,
}

impl MusicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicKind::Track => "track",
            MusicKind::Playlist => "playlist",
            MusicKind::Album => "album",
        }
    }
}

/// Where a game came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSource {
    Rawg,
    Gamezop,
    Puzzle,
}

/// Content type used for identity and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Track,
    Playlist,
    Album,
    Movie,
    Game,
    Puzzle,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentType::Track => "track",
            ContentType::Playlist => "playlist",
            ContentType::Album => "album",
            ContentType::Movie => "movie",
            ContentType::Game => "game",
            ContentType::Puzzle => "puzzle",
        };
        write!(f, "{}", s)
    }
}

/// A Deezer track, playlist or album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicItem {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: MusicKind,

    pub title: String,

    /// Album or track artist
    pub artist: Option<String>,

    /// Playlist owner
    pub creator: Option<String>,

    /// Album title for tracks
    pub album: Option<String>,

    pub image: String,
    pub image_large: String,

    #[serde(default)]
    pub track_count: u32,

    /// Formatted `m:ss`
    pub duration: String,

    /// 30-second preview URL (tracks only)
    pub preview: Option<String>,

    pub release_date: Option<String>,

    #[serde(default)]
    pub fans: u64,

    pub link: String,
    pub description: String,

    pub mood: Option<Mood>,
}

impl MusicItem {
    /// Artist for tracks and albums, creator for playlists
    pub fn byline(&self) -> &str {
        let name = match self.kind {
            MusicKind::Playlist => self.creator.as_deref(),
            _ => self.artist.as_deref(),
        };
        name.unwrap_or("Unknown")
    }
}

/// A TMDB movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub original_title: String,
    pub overview: String,

    /// `YYYY-MM-DD` or `TBA`
    pub release_date: String,

    /// Year part of the release date
    pub release_year: String,

    /// TMDB vote average on a 0-10 scale
    pub vote_average: Option<f64>,

    #[serde(default)]
    pub vote_count: u64,

    #[serde(default)]
    pub popularity: f64,

    pub image: String,
    pub image_large: String,
    pub backdrop: String,
    pub backdrop_large: String,

    #[serde(default)]
    pub genre_ids: Vec<u32>,

    /// Overview truncated for cards
    pub description: String,

    pub link: String,
    pub mood: Option<Mood>,
}

impl Movie {
    /// Rating formatted to one decimal, or `N/A`
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }
}

/// A RAWG game, Gamezop game or static puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub source: GameSource,
    pub title: String,
    pub image: Option<String>,

    /// Rating on a 0-5 scale
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub rating_count: u64,

    pub metacritic: Option<u32>,
    pub released: Option<String>,

    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub platforms: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    /// Average playtime in hours
    pub playtime: Option<u32>,

    pub esrb_rating: String,
    pub short_description: String,
    pub link: String,
    pub slug: Option<String>,

    /// "easy", "medium" or "hard"
    pub difficulty: Option<String>,

    /// Estimated session length, e.g. "5-15 min"
    pub duration: Option<String>,

    /// Play count (Gamezop)
    pub plays: Option<u64>,

    #[serde(default)]
    pub screenshots: Vec<String>,

    pub mood: Option<Mood>,
}

impl Game {
    /// Release year, if the release date is known
    pub fn release_year(&self) -> Option<&str> {
        self.released
            .as_deref()
            .and_then(|r| r.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

/// Normalized content from any provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ContentItem {
    Music(MusicItem),
    Movie(Movie),
    Game(Game),
}

impl ContentItem {
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Music(m) => &m.id,
            ContentItem::Movie(m) => &m.id,
            ContentItem::Game(g) => &g.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Music(m) => &m.title,
            ContentItem::Movie(m) => &m.title,
            ContentItem::Game(g) => &g.title,
        }
    }

    pub fn image(&self) -> Option<&str> {
        let image = match self {
            ContentItem::Music(m) => Some(m.image.as_str()),
            ContentItem::Movie(m) => Some(m.image.as_str()),
            ContentItem::Game(g) => g.image.as_deref(),
        };
        image.filter(|s| !s.is_empty())
    }

    pub fn link(&self) -> &str {
        match self {
            ContentItem::Music(m) => &m.link,
            ContentItem::Movie(m) => &m.link,
            ContentItem::Game(g) => &g.link,
        }
    }

    pub fn mood(&self) -> Option<Mood> {
        match self {
            ContentItem::Music(m) => m.mood,
            ContentItem::Movie(m) => m.mood,
            ContentItem::Game(g) => g.mood,
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::Music(m) => match m.kind {
                MusicKind::Track => ContentType::Track,
                MusicKind::Playlist => ContentType::Playlist,
                MusicKind::Album => ContentType::Album,
            },
            ContentItem::Movie(_) => ContentType::Movie,
            ContentItem::Game(g) => match g.source {
                GameSource::Puzzle => ContentType::Puzzle,
                _ => ContentType::Game,
            },
        }
    }

    /// Identity key `"{type}-{id}"`
    pub fn key(&self) -> String {
        format!("{}-{}", self.content_type(), self.id())
    }
}

impl From<MusicItem> for ContentItem {
    fn from(item: MusicItem) -> Self {
        ContentItem::Music(item)
    }
}

impl From<Movie> for ContentItem {
    fn from(movie: Movie) -> Self {
        ContentItem::Movie(movie)
    }
}

impl From<Game> for ContentItem {
    fn from(game: Game) -> Self {
        ContentItem::Game(game)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_content_type_and_key() {
        let item = ContentItem::from(track("42"));
        assert_eq!(item.content_type(), ContentType::Track);
        assert_eq!(item.key(), "track-42");

        let puzzle = ContentItem::from(game("wordle", GameSource::Puzzle));
        assert_eq!(puzzle.content_type(), ContentType::Puzzle);
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(movie("1", Some(7.456)).rating_label(), "7.5");
        assert_eq!(movie("1", None).rating_label(), "N/A");
        assert_eq!(movie("1", Some(0.0)).rating_label(), "N/A");
    }

    #[test]
    fn test_image_empty_is_none() {
        let mut t = track("1");
        t.image = String::new();
        assert!(ContentItem::from(t).image().is_none());
    }

    #[test]
    fn test_release_year() {
        assert_eq!(game("1", GameSource::Rawg).release_year(), Some("2020"));
    }
}
