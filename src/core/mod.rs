//! Core building blocks shared by providers and controllers.
//!
//! This module contains:
//! - TtlCache: time-based request cache
//! - Collections: dedup, shuffle and formatting helpers
//! - RequestSequence: latest-wins request tokens
//! - PomodoroTimer: focus timer state machine

pub mod cache;
pub mod collections;
pub mod sequence;
pub mod timer;

// Re-export commonly used types
pub use cache::{CacheEntry, TtlCache};
pub use sequence::{RequestSequence, RequestToken};
pub use timer::{Completion, PomodoroTimer, TimerMode, TimerSettings, MAX_MINUTES};
