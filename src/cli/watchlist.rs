//! Watchlist CLI subcommands.
//!
//! Provides commands to:
//! - `list`: Show saved entries, filtered by list and mood
//! - `add` / `remove` / `toggle`: Edit one list
//! - `stats`: Count entries per list

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::core::collections::truncate_text;
use crate::domain::Mood;
use crate::library::{
    MoodFilter, ToggleOutcome, TypeFilter, Watchlist, WatchlistEntry, WatchlistKind,
};

/// Watchlist-related subcommands
#[derive(Subcommand, Debug)]
pub enum WatchlistCommands {
    /// List saved entries
    List {
        /// Only this list (movies, music, games)
        #[arg(short = 't', long = "type")]
        kind: Option<WatchlistKind>,

        /// Only entries saved from this mood ("unknown" for untagged)
        #[arg(short, long, default_value = "all")]
        mood: MoodFilter,
    },

    /// Save an entry
    Add {
        /// List to add to (movies, music, games)
        kind: WatchlistKind,

        /// Provider id
        id: String,

        /// Display title
        #[arg(long)]
        title: String,

        /// Hub mood to tag the entry with
        #[arg(short, long)]
        mood: Option<String>,

        /// Link to the provider page
        #[arg(long)]
        link: Option<String>,

        /// Cover image URL
        #[arg(long)]
        image: Option<String>,
    },

    /// Remove an entry
    Remove {
        /// List to remove from (movies, music, games)
        kind: WatchlistKind,

        /// Provider id
        id: String,
    },

    /// Add the entry if absent, remove it otherwise
    Toggle {
        /// List to toggle in (movies, music, games)
        kind: WatchlistKind,

        /// Provider id
        id: String,

        /// Display title, used when adding
        #[arg(long, default_value = "")]
        title: String,

        /// Hub mood to tag the entry with, used when adding
        #[arg(short, long)]
        mood: Option<String>,
    },

    /// Count entries per list
    Stats,
}

/// Execute watchlist subcommands
pub async fn execute(command: WatchlistCommands) -> Result<()> {
    let watchlist = Watchlist::open_default()?;

    match command {
        WatchlistCommands::List { kind, mood } => {
            let types = kind.map(TypeFilter::Only).unwrap_or_default();
            list_entries(&watchlist, types, mood)
        }
        WatchlistCommands::Add {
            kind,
            id,
            title,
            mood,
            link,
            image,
        } => {
            let mut entry = entry(&id, &title, mood.as_deref());
            entry.link = link.unwrap_or_default();
            entry.image = image.unwrap_or_default();

            let added = watchlist
                .add(kind, entry)
                .with_context(|| format!("Failed to save {} to {}", id, kind))?;
            if added {
                println!("Added {} to {}", id, kind);
            } else {
                println!("{} is already in {}", id, kind);
            }
            Ok(())
        }
        WatchlistCommands::Remove { kind, id } => {
            let removed = watchlist
                .remove(kind, &id)
                .with_context(|| format!("Failed to remove {} from {}", id, kind))?;
            if removed {
                println!("Removed {} from {}", id, kind);
            } else {
                println!("{} was not in {}", id, kind);
            }
            Ok(())
        }
        WatchlistCommands::Toggle {
            kind,
            id,
            title,
            mood,
        } => {
            let outcome = if watchlist.contains(kind, &id) {
                watchlist.remove(kind, &id)?;
                ToggleOutcome::Removed(kind)
            } else {
                watchlist.add(kind, entry(&id, &title, mood.as_deref()))?;
                ToggleOutcome::Added(kind)
            };
            println!("{}", outcome.message());
            Ok(())
        }
        WatchlistCommands::Stats => {
            let stats = watchlist.stats();
            println!("{:<18} {}", "Movies", stats.movies);
            println!("{:<18} {}", "Music", stats.music);
            println!("{:<18} {}", "Games", stats.games);
            println!("{}", "-".repeat(24));
            println!("{:<18} {}", "Total", stats.total());
            Ok(())
        }
    }
}

fn entry(id: &str, title: &str, mood: Option<&str>) -> WatchlistEntry {
    WatchlistEntry {
        mood: mood.and_then(Mood::from_label),
        ..WatchlistEntry::new(id, title)
    }
}

fn list_entries(watchlist: &Watchlist, types: TypeFilter, mood: MoodFilter) -> Result<()> {
    let entries = watchlist.filtered(types, mood);
    if entries.is_empty() {
        println!("Your list is empty");
        return Ok(());
    }

    println!("{:<8} {:<18} {:<40} {:<12} {}", "LIST", "ID", "TITLE", "MOOD", "INFO");
    println!("{}", "-".repeat(100));
    for tagged in &entries {
        let entry = &tagged.entry;
        println!(
            "{:<8} {:<18} {:<40} {:<12} {}",
            tagged.kind.tag(),
            entry.id,
            truncate_text(&entry.title, 38),
            entry.mood.map(|m| m.as_str()).unwrap_or("-"),
            entry.meta(tagged.kind)
        );
    }
    println!("\n{} entries", entries.len());

    Ok(())
}
