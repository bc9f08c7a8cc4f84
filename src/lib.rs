//! flowstate - mood-based music, movies and games hub
//!
//! Aggregates content from Deezer, TMDB, RAWG, Gamezop and a built-in
//! puzzle catalog, keyed by one of five moods, and keeps a local
//! watchlist of saved items.
//!
//! # Architecture
//!
//! - Every provider goes through one async HTTP seam with a URL-keyed TTL cache
//! - Mood entry points never fail: errors degrade to curated fallback data
//! - Hub sections load concurrently and render independently
//! - Search commits only the latest query's results
//!
//! # Modules
//!
//! - `adapters`: Provider clients (Deezer, TMDB, RAWG, Gamezop, puzzles)
//! - `core`: Caching, request sequencing and the Pomodoro timer
//! - `domain`: Moods, query tables and normalized content
//! - `hub`: Per-mood hub controller
//! - `search`: Debounced latest-wins search
//! - `library`: JSON storage, watchlist and timer settings
//! - `render`: HTML cards, carousels and pages
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Browse a hub
//! flowstate hub focus
//!
//! # Render the static site
//! flowstate site --out ./public
//!
//! # Save a movie
//! flowstate watchlist add movies 603 --title "The Matrix" --mood energize
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod hub;
pub mod library;
pub mod render;
pub mod search;

// Re-export main types at crate root for convenience
pub use domain::{ContentItem, ContentType, Game, Movie, Mood, MusicItem};
pub use hub::{HubController, HubFilter, Providers, SectionState};
pub use library::{Storage, Watchlist, WatchlistEntry, WatchlistKind};
pub use search::{SearchCategory, SearchController, SearchOutcome};
