//! Saved state for flowstate.
//!
//! Everything the website keeps in `localStorage` lives in one JSON file:
//!
//! ```text
//! $FLOWSTATE_HOME/storage.json
//! {
//!   "flowstate_movie_watchlist": [ ... ],
//!   "flowstate_music_favorites": [ ... ],
//!   "flowstate_game_favorites":  [ ... ],
//!   "pomodoroSettings": { ... }
//! }
//! ```

pub mod settings;
pub mod storage;
pub mod watchlist;

pub use settings::{load_timer_settings, save_timer_settings, SETTINGS_KEY};
pub use storage::{Storage, StorageError};
pub use watchlist::{
    render_page as render_watchlist_page, render_stats, render_watchlist, MoodFilter, TaggedEntry, ToggleOutcome, TypeFilter,
    Watchlist, WatchlistEntry, WatchlistKind, WatchlistStats,
};
