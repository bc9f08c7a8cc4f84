//! Domain types for flowstate.
//!
//! - Mood: the five mood categories
//! - Content: normalized items from every provider
//! - Queries: static mood → provider query tables

pub mod content;
pub mod mood;
pub mod queries;

// Re-export commonly used types
pub use content::{ContentItem, ContentType, Game, GameSource, Movie, MusicItem, MusicKind};
pub use mood::{Mood, UnknownMood};
