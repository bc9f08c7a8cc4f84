//! Watchlist and favorites lists.
//!
//! Movies go on the watchlist, music and games are favorites. Each kind is
//! a JSON array stored under its own key in [`Storage`], using the same key
//! names the website writes.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::storage::{Storage, StorageError};
use crate::domain::mood::lenient_mood;
use crate::domain::{ContentItem, ContentType, Mood};
use crate::render::html::{self, escape_html};

pub const MOVIES_KEY: &str = "flowstate_movie_watchlist";
pub const MUSIC_KEY: &str = "flowstate_music_favorites";
pub const GAMES_KEY: &str = "flowstate_game_favorites";

const FALLBACK_IMAGE: &str = "https://placehold.co/600x338/0c0e13/9aa0a6?text=No+Image";

// ============================================================================
// Kinds and filters
// ============================================================================

/// Which stored list an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistKind {
    Movies,
    Music,
    Games,
}

impl WatchlistKind {
    pub const ALL: [WatchlistKind; 3] =
        [WatchlistKind::Movies, WatchlistKind::Music, WatchlistKind::Games];

    /// Storage key holding this list
    pub fn key(&self) -> &'static str {
        match self {
            WatchlistKind::Movies => MOVIES_KEY,
            WatchlistKind::Music => MUSIC_KEY,
            WatchlistKind::Games => GAMES_KEY,
        }
    }

    /// Singular tag shown on cards
    pub fn tag(&self) -> &'static str {
        match self {
            WatchlistKind::Movies => "movie",
            WatchlistKind::Music => "music",
            WatchlistKind::Games => "game",
        }
    }

    pub fn for_content(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Movie => WatchlistKind::Movies,
            ContentType::Track | ContentType::Playlist | ContentType::Album => {
                WatchlistKind::Music
            }
            ContentType::Game | ContentType::Puzzle => WatchlistKind::Games,
        }
    }
}

impl std::fmt::Display for WatchlistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WatchlistKind::Movies => "movies",
            WatchlistKind::Music => "music",
            WatchlistKind::Games => "games",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for WatchlistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movies" | "movie" => Ok(WatchlistKind::Movies),
            "music" => Ok(WatchlistKind::Music),
            "games" | "game" => Ok(WatchlistKind::Games),
            _ => Err(format!("Unknown list: {} (expected movies, music or games)", s)),
        }
    }
}

/// Type filter for the watchlist grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(WatchlistKind),
}

/// Mood filter for the watchlist grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodFilter {
    #[default]
    All,
    Mood(Mood),
    /// Entries saved outside any hub
    Untagged,
}

impl MoodFilter {
    fn matches(&self, mood: Option<Mood>) -> bool {
        match self {
            MoodFilter::All => true,
            MoodFilter::Mood(m) => mood == Some(*m),
            MoodFilter::Untagged => mood.is_none(),
        }
    }
}

impl std::str::FromStr for MoodFilter {
    type Err = crate::domain::UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(MoodFilter::All),
            "unknown" => Ok(MoodFilter::Untagged),
            other => other.parse().map(MoodFilter::Mood),
        }
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Minimal projection of a saved item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    /// Provider id; numeric ids from older saves are stringified
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, alias = "name")]
    pub title: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub image_large: String,

    #[serde(default)]
    pub link: String,

    /// Vote average (out of 10) for movies, RAWG rating (out of 5) for games
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,

    #[serde(default, alias = "overview", skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<u32>,

    /// Hub mood active when the entry was saved
    #[serde(default, deserialize_with = "lenient_mood")]
    pub mood: Option<Mood>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    /// Bare entry with only an id and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image: String::new(),
            image_large: String::new(),
            link: String::new(),
            rating: None,
            release_year: None,
            description: String::new(),
            artist: None,
            creator: None,
            track_count: None,
            metacritic: None,
            mood: None,
            added_at: Some(Utc::now()),
        }
    }

    /// Project a content item, tagging it with the active hub mood
    pub fn from_item(item: &ContentItem, mood: Option<Mood>) -> Self {
        let mut entry = Self {
            image: item.image().unwrap_or_default().to_string(),
            link: item.link().to_string(),
            mood: mood.or(item.mood()),
            ..Self::new(item.id(), item.title())
        };

        match item {
            ContentItem::Movie(movie) => {
                if entry.image.is_empty() {
                    entry.image = movie.image_large.clone();
                }
                entry.image_large = movie.image_large.clone();
                entry.rating = movie.vote_average.filter(|v| *v > 0.0);
                entry.release_year = Some(movie.release_year.clone()).filter(|y| !y.is_empty());
                entry.description = if movie.overview.is_empty() {
                    movie.description.clone()
                } else {
                    movie.overview.clone()
                };
            }
            ContentItem::Music(music) => {
                entry.image_large = music.image_large.clone();
                entry.artist = music.artist.clone();
                entry.creator = music.creator.clone();
                entry.track_count = Some(music.track_count).filter(|n| *n > 0);
                entry.description = music.description.clone();
            }
            ContentItem::Game(game) => {
                entry.rating = Some(game.rating).filter(|r| *r > 0.0);
                entry.metacritic = game.metacritic;
                entry.release_year = game.release_year().map(str::to_string);
                entry.description = game.short_description.clone();
            }
        }

        entry
    }

    /// Card meta line, segments joined with a bullet
    pub fn meta(&self, kind: WatchlistKind) -> String {
        let parts: Vec<String> = match kind {
            WatchlistKind::Movies => vec![
                self.release_year.clone(),
                self.rating.map(|r| format!("{:.1}/10", r)),
            ],
            WatchlistKind::Music => vec![
                self.artist.clone().or_else(|| self.creator.clone()),
                self.track_count.map(|n| format!("{} tracks", n)),
            ],
            WatchlistKind::Games => vec![
                self.metacritic.map(|m| format!("Metacritic {}", m)),
                self.rating.map(|r| format!("{:.1}/5", r)),
            ],
        }
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        parts.join(" • ")
    }
}

/// An entry tagged with the list it came from
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEntry {
    pub kind: WatchlistKind,
    pub entry: WatchlistEntry,
}

/// Result of a toggle, carrying the toast message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(WatchlistKind),
    Removed(WatchlistKind),
}

impl ToggleOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ToggleOutcome::Added(WatchlistKind::Movies) => "Added to watchlist!",
            ToggleOutcome::Removed(WatchlistKind::Movies) => "Removed from watchlist",
            ToggleOutcome::Added(_) => "Added to favorites!",
            ToggleOutcome::Removed(_) => "Removed from favorites",
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, ToggleOutcome::Added(_))
    }
}

/// Per-list counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatchlistStats {
    pub movies: usize,
    pub music: usize,
    pub games: usize,
}

impl WatchlistStats {
    pub fn total(&self) -> usize {
        self.movies + self.music + self.games
    }
}

// ============================================================================
// Watchlist
// ============================================================================

/// The three saved lists on top of a storage file
#[derive(Debug, Clone)]
pub struct Watchlist {
    storage: Storage,
}

impl Watchlist {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Watchlist in the default storage file
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(Storage::open_default()?))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Entries of one list, in insertion order.
    ///
    /// Entries that fail to decode are skipped but stay in storage.
    pub fn list(&self, kind: WatchlistKind) -> Vec<WatchlistEntry> {
        self.raw(kind)
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(list = %kind, error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .collect()
    }

    fn raw(&self, kind: WatchlistKind) -> Vec<Value> {
        self.storage.get(kind.key()).unwrap_or_default()
    }

    /// Ids of one list, used to render pressed favorite buttons
    pub fn ids(&self, kind: WatchlistKind) -> HashSet<String> {
        self.list(kind).into_iter().map(|e| e.id).collect()
    }

    pub fn contains(&self, kind: WatchlistKind, id: &str) -> bool {
        self.list(kind).iter().any(|e| e.id == id)
    }

    /// Append an entry unless its id is already present.
    ///
    /// Returns whether the entry was added.
    pub fn add(&self, kind: WatchlistKind, entry: WatchlistEntry) -> Result<bool, StorageError> {
        let id = entry.id.clone();
        let encoded = serde_json::to_value(&entry).map_err(|source| StorageError::Serialize {
            key: kind.key().to_string(),
            source,
        })?;
        let added = self
            .storage
            .update(kind.key(), |list: &mut Vec<Value>| {
                if list.iter().any(|v| has_id(v, &id)) {
                    false
                } else {
                    list.push(encoded);
                    true
                }
            })?;

        if added {
            info!(list = %kind, id = %id, "Saved to list");
        } else {
            debug!(list = %kind, id = %id, "Already saved");
        }
        Ok(added)
    }

    /// Save a content item to the list matching its type
    pub fn add_item(&self, item: &ContentItem, mood: Option<Mood>) -> Result<bool, StorageError> {
        let kind = WatchlistKind::for_content(item.content_type());
        self.add(kind, WatchlistEntry::from_item(item, mood))
    }

    /// Remove by id; absent ids are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, kind: WatchlistKind, id: &str) -> Result<bool, StorageError> {
        if !self.raw(kind).iter().any(|v| has_id(v, id)) {
            debug!(list = %kind, id, "Nothing to remove");
            return Ok(false);
        }

        let removed = self
            .storage
            .update(kind.key(), |list: &mut Vec<Value>| {
                let before = list.len();
                list.retain(|v| !has_id(v, id));
                before != list.len()
            })?;

        if removed {
            info!(list = %kind, id, "Removed from list");
        }
        Ok(removed)
    }

    /// Add the item if absent, remove it otherwise
    pub fn toggle(
        &self,
        item: &ContentItem,
        mood: Option<Mood>,
    ) -> Result<ToggleOutcome, StorageError> {
        let kind = WatchlistKind::for_content(item.content_type());
        if self.contains(kind, item.id()) {
            self.remove(kind, item.id())?;
            Ok(ToggleOutcome::Removed(kind))
        } else {
            self.add(kind, WatchlistEntry::from_item(item, mood))?;
            Ok(ToggleOutcome::Added(kind))
        }
    }

    pub fn stats(&self) -> WatchlistStats {
        WatchlistStats {
            movies: self.list(WatchlistKind::Movies).len(),
            music: self.list(WatchlistKind::Music).len(),
            games: self.list(WatchlistKind::Games).len(),
        }
    }

    /// Entries matching both filters: movies first, then music, then games
    pub fn filtered(&self, types: TypeFilter, mood: MoodFilter) -> Vec<TaggedEntry> {
        WatchlistKind::ALL
            .into_iter()
            .filter(|kind| match types {
                TypeFilter::All => true,
                TypeFilter::Only(only) => only == *kind,
            })
            .flat_map(|kind| {
                self.list(kind)
                    .into_iter()
                    .map(move |entry| TaggedEntry { kind, entry })
            })
            .filter(|tagged| mood.matches(tagged.entry.mood))
            .collect()
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the watchlist grid, or the empty state when nothing matches
pub fn render_watchlist(entries: &[TaggedEntry]) -> String {
    if entries.is_empty() {
        return r#"<div class="wl-empty" id="watchlist-empty">
    <h3>Your list is empty</h3>
    <p>Save movies, music and games from any mood hub to see them here.</p>
</div>"#
            .to_string();
    }

    let cards: Vec<String> = entries.iter().map(render_card).collect();
    format!(
        "<div class=\"wl-grid\" id=\"watchlist-grid\">\n{}\n</div>",
        cards.join("\n")
    )
}

/// Render the stats bar
pub fn render_stats(stats: &WatchlistStats) -> String {
    format!(
        r#"<div class="wl-stats">
    <span data-stat="movies"><strong>{}</strong> Movies</span>
    <span data-stat="music"><strong>{}</strong> Music</span>
    <span data-stat="games"><strong>{}</strong> Games</span>
</div>"#,
        stats.movies, stats.music, stats.games
    )
}

/// Full watchlist page: stats bar plus the filtered grid
pub fn render_page(watchlist: &Watchlist, types: TypeFilter, mood: MoodFilter) -> String {
    let entries = watchlist.filtered(types, mood);
    let body = format!(
        "<header class=\"wl-header\"><h1>My List</h1></header>\n{}\n{}",
        render_stats(&watchlist.stats()),
        render_watchlist(&entries)
    );
    html::page("My List", None, &body)
}

fn render_card(tagged: &TaggedEntry) -> String {
    let TaggedEntry { kind, entry } = tagged;
    let tag = kind.tag();
    let title = if entry.title.is_empty() {
        "Untitled".to_string()
    } else {
        escape_html(&entry.title)
    };
    let image = [&entry.image_large, &entry.image]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(|s| escape_html(s))
        .unwrap_or_else(|| FALLBACK_IMAGE.to_string());
    let link = if entry.link.is_empty() {
        "#".to_string()
    } else {
        escape_html(&entry.link)
    };

    let mood_badge = entry
        .mood
        .map(|m| {
            format!(
                r#"<span class="wl-card__mood-badge mood-badge mood-badge--{m}" title="{m} mood">{m}</span>"#,
                m = m
            )
        })
        .unwrap_or_default();
    let description = if entry.description.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="wl-card__desc">{}</p>"#,
            escape_html(&entry.description)
        )
    };

    format!(
        r#"<article class="wl-card" data-list="{kind}" data-id="{id}">
    <div class="wl-card__image-wrap is-{tag}">
        <img src="{image}" alt="{title}" class="wl-card__image is-{tag}" loading="lazy">
        <span class="wl-card__badge">{tag_upper}</span>
        {mood_badge}
    </div>
    <div class="wl-card__body">
        <h3 class="wl-card__title">{title}</h3>
        <div class="wl-card__meta">{meta}</div>
        {description}
    </div>
    <div class="wl-card__actions">
        <a href="{link}" target="_blank" rel="noopener noreferrer" class="wl-link wl-link--primary">Open</a>
        <button class="wl-btn wl-btn--danger" data-action="remove" data-list="{kind}" data-id="{id}">Remove</button>
    </div>
</article>"#,
        kind = kind,
        id = escape_html(&entry.id),
        tag = tag,
        tag_upper = tag.to_uppercase(),
        image = image,
        title = title,
        mood_badge = mood_badge,
        meta = escape_html(&entry.meta(*kind)),
        description = description,
        link = link,
    )
}

// ============================================================================
// Lenient field decoding
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Whether a stored entry carries `id`, read the way [`string_or_number`] reads it
fn has_id(value: &Value, id: &str) -> bool {
    match value.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{}", f as i64) == id,
            Some(f) => f.to_string() == id,
            None => false,
        },
        _ => false,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::deserialize(deserializer)? {
        Loose::Text(s) => Ok(s),
        Loose::Number(n) if n.fract() == 0.0 => Ok(format!("{}", n as i64)),
        Loose::Number(n) => Ok(n.to_string()),
        Loose::Other(v) => Err(serde::de::Error::custom(format!("invalid id: {}", v))),
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Number(n) => Some(n),
        Loose::Text(s) => s.trim().parse().ok(),
        Loose::Other(_) => None,
    }
    .filter(|n: &f64| n.is_finite() && *n > 0.0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => Some(s),
        Loose::Number(n) => Some(format!("{}", n as i64)),
        Loose::Other(_) => None,
    }
    .filter(|s| !s.is_empty()))
}
