//! Deezer music client.
//!
//! Uses the public, unauthenticated search API. The base URL is configurable
//! so a proxy can sit in front of `api.deezer.com` when needed.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{first_non_empty, parse_base_url, CachedFetcher, HttpClient, ProviderError, DEFAULT_TIMEOUT};
use crate::config::ConfigError;
use crate::core::collections::{dedup_by_key, format_duration, per_part, shuffle_take};
use crate::domain::queries::music_queries;
use crate::domain::{Mood, MusicItem, MusicKind};

pub const PROVIDER: &str = "deezer";

/// Default public API base
pub const DEFAULT_BASE_URL: &str = "https://api.deezer.com";

/// Cache lifetime for Deezer responses
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Maximum number of mood queries issued per call
const QUERIES_PER_MOOD: usize = 3;

/// Configuration for the Deezer client
#[derive(Debug, Clone)]
pub struct DeezerConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for DeezerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Which Deezer search a mood query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCategory {
    Playlists,
    Albums,
    Tracks,
}

// ============================================================================
// Response payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistPayload {
    id: u64,
    title: Option<String>,
    user: Option<Named>,
    picture: Option<String>,
    picture_medium: Option<String>,
    picture_big: Option<String>,
    picture_xl: Option<String>,
    nb_tracks: Option<u32>,
    link: Option<String>,
    fans: Option<u64>,
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AlbumPayload {
    id: u64,
    title: Option<String>,
    artist: Option<Named>,
    cover: Option<String>,
    cover_medium: Option<String>,
    cover_big: Option<String>,
    cover_xl: Option<String>,
    nb_tracks: Option<u32>,
    link: Option<String>,
    release_date: Option<String>,
    fans: Option<u64>,
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TrackAlbum {
    title: Option<String>,
    cover_medium: Option<String>,
    cover_big: Option<String>,
    cover_xl: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackPayload {
    id: u64,
    title: Option<String>,
    artist: Option<Named>,
    album: Option<TrackAlbum>,
    duration: Option<u64>,
    link: Option<String>,
    preview: Option<String>,
}

// ============================================================================
// Formatting
// ============================================================================

fn name_of(named: &Option<Named>) -> Option<String> {
    named
        .as_ref()
        .and_then(|n| n.name.clone())
        .filter(|n| !n.is_empty())
}

fn link_or_hash(link: Option<String>) -> String {
    link.filter(|l| !l.is_empty()).unwrap_or_else(|| "#".to_string())
}

fn format_playlist(p: PlaylistPayload) -> MusicItem {
    let track_count = p.nb_tracks.unwrap_or(0);
    MusicItem {
        id: p.id.to_string(),
        kind: MusicKind::Playlist,
        title: p
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled Playlist".to_string()),
        artist: None,
        creator: Some(name_of(&p.user).unwrap_or_else(|| "Unknown".to_string())),
        album: None,
        image: first_non_empty(&[&p.picture_medium, &p.picture_big, &p.picture]).unwrap_or_default(),
        image_large: first_non_empty(&[&p.picture_big, &p.picture_xl, &p.picture_medium])
            .unwrap_or_default(),
        track_count,
        duration: format_duration(p.duration),
        preview: None,
        release_date: None,
        fans: p.fans.unwrap_or(0),
        link: link_or_hash(p.link),
        description: format!("{} tracks", track_count),
        mood: None,
    }
}

fn format_album(a: AlbumPayload) -> MusicItem {
    let track_count = a.nb_tracks.unwrap_or(0);
    let artist = name_of(&a.artist).unwrap_or_else(|| "Unknown Artist".to_string());
    MusicItem {
        id: a.id.to_string(),
        kind: MusicKind::Album,
        title: a
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled Album".to_string()),
        description: format!("{} • {} tracks", artist, track_count),
        artist: Some(artist),
        creator: None,
        album: None,
        image: first_non_empty(&[&a.cover_medium, &a.cover_big, &a.cover]).unwrap_or_default(),
        image_large: first_non_empty(&[&a.cover_big, &a.cover_xl, &a.cover_medium]).unwrap_or_default(),
        track_count,
        duration: format_duration(a.duration),
        preview: None,
        release_date: a.release_date.filter(|d| !d.is_empty()),
        fans: a.fans.unwrap_or(0),
        link: link_or_hash(a.link),
        mood: None,
    }
}

fn format_track(t: TrackPayload) -> MusicItem {
    let artist = name_of(&t.artist);
    let album = t.album.as_ref();
    let album_title = album.and_then(|a| a.title.clone()).filter(|s| !s.is_empty());
    let image = album
        .and_then(|a| first_non_empty(&[&a.cover_medium, &a.cover_big]))
        .unwrap_or_default();
    let image_large = album
        .and_then(|a| first_non_empty(&[&a.cover_big, &a.cover_xl]))
        .unwrap_or_default();

    MusicItem {
        id: t.id.to_string(),
        kind: MusicKind::Track,
        title: t
            .title
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Untitled Track".to_string()),
        description: format!(
            "{} • {}",
            artist.as_deref().unwrap_or("Unknown"),
            album_title.as_deref().unwrap_or("Single")
        ),
        artist: Some(artist.unwrap_or_else(|| "Unknown Artist".to_string())),
        creator: None,
        album: album_title,
        image,
        image_large,
        track_count: 0,
        duration: format_duration(t.duration),
        preview: t.preview.filter(|p| !p.is_empty()),
        release_date: None,
        fans: 0,
        link: link_or_hash(t.link),
        mood: None,
    }
}

// ============================================================================
// Client
// ============================================================================

/// Deezer search client with a 30 minute response cache
pub struct DeezerClient {
    fetcher: CachedFetcher,
}

impl DeezerClient {
    pub fn new(config: DeezerConfig, http: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(PROVIDER, &config.base_url)?;
        Ok(Self {
            fetcher: CachedFetcher::new(PROVIDER, http, base_url, config.timeout, CACHE_TTL),
        })
    }

    async fn search<T>(&self, endpoint: &str, query: &str, limit: usize) -> Result<Vec<T>, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        let response: SearchResponse<T> = self.fetcher.fetch_as(endpoint, &params).await?;
        Ok(response.data)
    }

    async fn try_search(
        &self,
        category: MusicCategory,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MusicItem>, ProviderError> {
        Ok(match category {
            MusicCategory::Playlists => self
                .search::<PlaylistPayload>("/search/playlist", query, limit)
                .await?
                .into_iter()
                .map(format_playlist)
                .collect(),
            MusicCategory::Albums => self
                .search::<AlbumPayload>("/search/album", query, limit)
                .await?
                .into_iter()
                .map(format_album)
                .collect(),
            MusicCategory::Tracks => self
                .search::<TrackPayload>("/search/track", query, limit)
                .await?
                .into_iter()
                .map(format_track)
                .collect(),
        })
    }

    async fn search_or_empty(&self, category: MusicCategory, query: &str, limit: usize) -> Vec<MusicItem> {
        match self.try_search(category, query, limit).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, query, "Deezer search failed");
                Vec::new()
            }
        }
    }

    /// Search playlists; failures yield an empty list
    pub async fn search_playlists(&self, query: &str, limit: usize) -> Vec<MusicItem> {
        self.search_or_empty(MusicCategory::Playlists, query, limit).await
    }

    /// Search albums; failures yield an empty list
    pub async fn search_albums(&self, query: &str, limit: usize) -> Vec<MusicItem> {
        self.search_or_empty(MusicCategory::Albums, query, limit).await
    }

    /// Search tracks; failures yield an empty list
    pub async fn search_tracks(&self, query: &str, limit: usize) -> Vec<MusicItem> {
        self.search_or_empty(MusicCategory::Tracks, query, limit).await
    }

    /// Mood-based music.
    ///
    /// Runs the first three mood queries concurrently with `ceil(limit / 3)`
    /// results each, then dedups, shuffles and truncates. When every query
    /// came back empty and at least one failed, the mood fallback is returned.
    #[instrument(skip(self), fields(provider = PROVIDER))]
    pub async fn get_mood_content(&self, mood: Mood, category: MusicCategory, limit: usize) -> Vec<MusicItem> {
        let queries = music_queries(mood);
        let terms = match category {
            MusicCategory::Playlists => queries.playlists,
            MusicCategory::Albums => queries.albums,
            MusicCategory::Tracks => queries.tracks,
        };
        let terms = &terms[..terms.len().min(QUERIES_PER_MOOD)];
        if terms.is_empty() {
            warn!(%mood, "No music queries for mood");
            return Vec::new();
        }

        let per_query = per_part(limit, terms.len());
        let results = join_all(terms.iter().map(|q| self.try_search(category, q, per_query))).await;

        let mut failures = 0;
        let mut items = Vec::new();
        for result in results {
            match result {
                Ok(batch) => items.extend(batch),
                Err(e) => {
                    warn!(error = %e, "Deezer mood query failed");
                    failures += 1;
                }
            }
        }

        if items.is_empty() && failures > 0 {
            warn!(%mood, failures, "Using Deezer fallback");
            let mut fallback = fallback_music(mood);
            fallback.truncate(limit);
            return fallback;
        }

        let items = dedup_by_key(items, |i| (i.kind, i.id.clone()));
        let items: Vec<MusicItem> = shuffle_take(items, limit)
            .into_iter()
            .map(|mut i| {
                i.mood = Some(mood);
                i
            })
            .collect();

        info!(%mood, count = items.len(), "Loaded mood music");
        items
    }

    pub fn clear_cache(&self) {
        self.fetcher.clear_cache();
        info!("Deezer cache cleared");
    }
}

/// Static playlists shown when Deezer is unreachable.
///
/// Each entry links to the Deezer playlist search for one of the mood's
/// queries, so the links stay valid without knowing playlist ids.
pub fn fallback_music(mood: Mood) -> Vec<MusicItem> {
    music_queries(mood)
        .playlists
        .iter()
        .take(QUERIES_PER_MOOD)
        .enumerate()
        .map(|(n, query)| MusicItem {
            id: format!("fallback-{}-{}", mood, n + 1),
            kind: MusicKind::Playlist,
            title: title_case(query),
            artist: None,
            creator: Some("Deezer".to_string()),
            album: None,
            image: String::new(),
            image_large: String::new(),
            track_count: 0,
            duration: format_duration(None),
            preview: None,
            release_date: None,
            fans: 0,
            link: format!(
                "https://www.deezer.com/search/{}/playlist",
                query.replace(' ', "%20")
            ),
            description: format!("{} playlists on Deezer", title_case(query)),
            mood: Some(mood),
        })
        .collect()
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
