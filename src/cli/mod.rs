//! Command-line interface for flowstate.
//!
//! Provides commands for browsing mood hubs, rendering the static site,
//! searching music and movies, managing the watchlist and running the
//! Pomodoro timer.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::adapters::ReqwestHttpClient;
use crate::config::{self, paths};
use crate::core::collections::truncate_text;
use crate::core::{PomodoroTimer, TimerMode, MAX_MINUTES};
use crate::domain::{ContentItem, Game, Mood};
use crate::hub::{HubController, HubFilter, Providers, SectionState};
use crate::library::{
    load_timer_settings, render_watchlist_page, save_timer_settings, MoodFilter, Storage,
    TypeFilter, Watchlist,
};
use crate::render::{GameRenderer, MovieRenderer};
use crate::search::{SearchCategory, SearchController, SearchOutcome};

pub mod watchlist;

/// Number of puzzles and quick games listed per mood
const PUZZLE_LIMIT: usize = 12;

/// flowstate - mood-based music, movies and games
#[derive(Parser, Debug)]
#[command(name = "flowstate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load one mood hub
    Hub {
        /// Mood (focus, relax, energize, creative, melancholy)
        mood: String,

        /// Section filter (all, music, movies, games)
        #[arg(short, long, default_value = "all")]
        filter: HubFilter,

        /// Write the rendered page to this file instead of listing content
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render every hub page plus the watchlist page
    Site {
        /// Output directory (defaults to paths.site from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Search music and movies
    Search {
        /// Search query (omit with --interactive)
        query: Option<String>,

        /// Result category (all, music, movies)
        #[arg(short, long, default_value = "all")]
        category: SearchCategory,

        /// Read queries from stdin, one per line; only the latest wins
        #[arg(short, long)]
        interactive: bool,
    },

    /// Manage the watchlist and favorites
    Watchlist {
        #[command(subcommand)]
        command: watchlist::WatchlistCommands,
    },

    /// Show details of a TMDB movie
    Movie {
        /// TMDB movie id
        id: String,

        /// Print the detail view HTML
        #[arg(long)]
        html: bool,
    },

    /// Show details of a RAWG game or a puzzle
    Game {
        /// RAWG game id or puzzle id
        id: String,

        /// Print the info panel HTML (puzzles) or raw details JSON (RAWG)
        #[arg(long)]
        raw: bool,
    },

    /// List puzzles and quick games for a mood
    Puzzles {
        /// Mood (focus, relax, energize, creative, melancholy)
        mood: String,
    },

    /// Run the Pomodoro timer
    Timer {
        /// Starting mode (pomodoro, short-break, long-break)
        #[arg(short, long)]
        mode: Option<TimerMode>,

        /// Focus length in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_MINUTES as i64))]
        pomodoro: Option<u32>,

        /// Short break length in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_MINUTES as i64))]
        short_break: Option<u32>,

        /// Long break length in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_MINUTES as i64))]
        long_break: Option<u32>,

        /// Persist the given lengths as the new defaults
        #[arg(long)]
        save: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Hub { mood, filter, out } => show_hub(&mood, filter, out).await,
            Commands::Site { out } => build_site(out).await,
            Commands::Search {
                query,
                category,
                interactive,
            } => {
                if interactive {
                    search_interactive(category).await
                } else {
                    let query = query.context("No query provided. Pass a query or use --interactive")?;
                    search_once(&query, category).await
                }
            }
            Commands::Watchlist { command } => watchlist::execute(command).await,
            Commands::Movie { id, html } => show_movie(&id, html).await,
            Commands::Game { id, raw } => show_game(&id, raw).await,
            Commands::Puzzles { mood } => list_puzzles(&mood).await,
            Commands::Timer {
                mode,
                pomodoro,
                short_break,
                long_break,
                save,
            } => run_timer(mode, pomodoro, short_break, long_break, save).await,
            Commands::Config => show_config().await,
        }
    }
}

/// Build provider clients from the global configuration
fn providers() -> Result<Providers> {
    let cfg = config::config()?;
    Providers::from_config(cfg, Arc::new(ReqwestHttpClient::new()))
        .context("Invalid provider configuration")
}

fn parse_mood(label: &str) -> Result<Mood> {
    Mood::from_label(label).with_context(|| {
        format!(
            "Unknown mood '{}'. Expected one of: focus, relax, energize, creative, melancholy",
            label
        )
    })
}

/// Write `content` to `path`, creating parent directories
async fn write_page(path: &std::path::Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

// ============================================================================
// Hub and site
// ============================================================================

/// Load a hub and either list it or write the rendered page
async fn show_hub(label: &str, filter: HubFilter, out: Option<PathBuf>) -> Result<()> {
    let mood = parse_mood(label)?;
    let mut hub = HubController::new(mood, providers()?);
    hub.set_filter(filter);
    let content = hub.load_content().await;

    if let Some(path) = out {
        let watchlist = Watchlist::open_default()?;
        write_page(&path, &hub.render_page(&watchlist)).await?;
        println!("Wrote {} hub to {}", mood.label(), path.display());
        return Ok(());
    }

    println!("{} Hub", mood.label());
    println!("{}", "=".repeat(60));

    if filter.shows(HubFilter::Music) {
        print_section("Music", &content.music, |m| {
            format!("{:<10} {:<40} {}", m.kind.as_str(), truncate_text(&m.title, 38), m.byline())
        });
    }
    if filter.shows(HubFilter::Movies) {
        print_section("Movies", &content.movies, |m| {
            format!(
                "{:<10} {:<40} {} ({})",
                m.id,
                truncate_text(&m.title, 38),
                m.release_year,
                m.rating_label()
            )
        });
    }
    if filter.shows(HubFilter::Games) {
        print_section("Games", &content.games, game_row);
    }

    Ok(())
}

fn print_section<T>(heading: &str, state: &SectionState<T>, row: impl Fn(&T) -> String) {
    println!();
    println!("{}", heading);
    println!("{}", "-".repeat(60));
    match state {
        SectionState::Loaded(items) => {
            for item in items {
                println!("  {}", row(item));
            }
        }
        SectionState::Empty => println!("  (nothing found)"),
        SectionState::Error(message) => println!("  (error: {})", message),
    }
}

fn game_row(game: &Game) -> String {
    let rating = if game.rating > 0.0 {
        format!("{:.1}/5", game.rating)
    } else {
        "-".to_string()
    };
    format!(
        "{:<18} {:<40} {}",
        game.id,
        truncate_text(&game.title, 38),
        rating
    )
}

/// Render all hub pages and the watchlist page into `out`
async fn build_site(out: Option<PathBuf>) -> Result<()> {
    let out = match out {
        Some(dir) => dir,
        None => paths::site_dir()?,
    };
    let providers = providers()?;
    let watchlist = Watchlist::open_default()?;

    let hubs: Vec<HubController> = Mood::ALL
        .into_iter()
        .map(|mood| HubController::new(mood, providers.clone()))
        .collect();
    join_all(hubs.iter().map(|hub| hub.load_content())).await;

    for hub in &hubs {
        let path = out.join(paths::hub_page_name(hub.mood()));
        write_page(&path, &hub.render_page(&watchlist)).await?;
        println!("  {:<18} {}", hub.mood().label(), path.display());
    }

    let path = out.join(paths::WATCHLIST_PAGE);
    let page = render_watchlist_page(&watchlist, TypeFilter::All, MoodFilter::All);
    write_page(&path, &page).await?;
    println!("  {:<18} {}", "Watchlist", path.display());

    println!("\nSite written to {}", out.display());
    Ok(())
}

// ============================================================================
// Search
// ============================================================================

fn print_results(items: &[ContentItem]) {
    if items.is_empty() {
        println!("No results");
        return;
    }

    println!("{:<10} {:<18} {:<40}", "TYPE", "ID", "TITLE");
    println!("{}", "-".repeat(70));
    for item in items {
        println!(
            "{:<10} {:<18} {:<40}",
            item.content_type(),
            item.id(),
            truncate_text(item.title(), 38)
        );
    }
}

async fn search_once(query: &str, category: SearchCategory) -> Result<()> {
    let controller = SearchController::from_providers(&providers()?);
    controller.set_category(category);

    match controller.search_now(query).await {
        SearchOutcome::Cleared => anyhow::bail!("Search query is empty"),
        SearchOutcome::Superseded => Ok(()),
        SearchOutcome::Completed(results) => {
            print_results(&results.items(controller.category()));
            Ok(())
        }
    }
}

/// Treat each stdin line as a keystroke-level input
async fn search_interactive(category: SearchCategory) -> Result<()> {
    let controller = Arc::new(SearchController::from_providers(&providers()?));
    controller.set_category(category);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Vec::new();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        let controller = controller.clone();
        pending.push(tokio::spawn(async move {
            match controller.input(&line).await {
                SearchOutcome::Completed(results) => {
                    println!("\n[{}]", results.query);
                    print_results(&results.items(controller.category()));
                }
                SearchOutcome::Cleared => println!("\n[cleared]"),
                SearchOutcome::Superseded => {}
            }
        }));
    }

    for handle in join_all(pending).await {
        handle.context("Search task panicked")?;
    }
    Ok(())
}

// ============================================================================
// Details
// ============================================================================

async fn show_movie(id: &str, html: bool) -> Result<()> {
    let providers = providers()?;
    let tmdb = providers
        .tmdb
        .context("TMDB is not configured. Set TMDB_API_KEY or providers.tmdb.api_key")?;

    let details = tmdb
        .movie_details(id)
        .await
        .with_context(|| format!("Failed to load movie {}", id))?;

    if html {
        println!("{}", MovieRenderer::new().render_details(&details));
        return Ok(());
    }

    let movie = &details.movie;
    println!("{} ({})", movie.title, movie.release_year);
    if !details.tagline.is_empty() {
        println!("\"{}\"", details.tagline);
    }
    println!();
    println!("Rating:   {} / 10 ({} votes)", movie.rating_label(), movie.vote_count);
    println!("Runtime:  {}", details.runtime);
    println!("Genres:   {}", details.genres.join(", "));
    println!("Director: {}", details.director);
    if !details.cast.is_empty() {
        println!("\nCast:");
        for member in &details.cast {
            println!("  {:<24} {}", member.name, member.character);
        }
    }
    if let Some(trailer) = &details.trailer {
        println!("\nTrailer: {}", trailer);
    }
    println!("\n{}", movie.overview);
    if !details.similar.is_empty() {
        println!("\nSimilar:");
        for similar in &details.similar {
            println!("  {:<10} {}", similar.id, similar.title);
        }
    }

    Ok(())
}

async fn show_game(id: &str, raw: bool) -> Result<()> {
    let providers = providers()?;

    if let Some(puzzle) = providers.puzzles.puzzle_details(id) {
        if raw {
            println!("{}", GameRenderer::new().render_info(&puzzle));
        } else {
            println!("{}", puzzle.title);
            println!();
            println!("Difficulty: {}", puzzle.difficulty.as_deref().unwrap_or("-"));
            println!("Duration:   {}", puzzle.duration.as_deref().unwrap_or("-"));
            println!("Rating:     {:.1}/5", puzzle.rating);
            println!("Play:       {}", puzzle.link);
            println!("\n{}", puzzle.short_description);
        }
        return Ok(());
    }

    let rawg = providers
        .rawg
        .context("RAWG is not configured. Set RAWG_API_KEY or providers.rawg.api_key")?;
    let details = rawg
        .game_details(id)
        .await
        .with_context(|| format!("Failed to load game {}", id))?;

    if raw {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{}", details.title);
    println!();
    println!("Rating:     {:.1}/5", details.rating);
    if let Some(metacritic) = details.metacritic {
        println!("Metacritic: {}", metacritic);
    }
    println!("Released:   {}", details.released.as_deref().unwrap_or("TBA"));
    println!("Genres:     {}", details.genres.join(", "));
    println!("Developers: {}", details.developers.join(", "));
    println!("ESRB:       {}", details.esrb_rating);
    if let Some(hours) = details.playtime {
        println!("Playtime:   {}h avg", hours);
    }
    if !details.website.is_empty() {
        println!("Website:    {}", details.website);
    }
    println!("\n{}", details.description);

    Ok(())
}

async fn list_puzzles(label: &str) -> Result<()> {
    let mood = parse_mood(label)?;
    let providers = providers()?;

    let puzzles = providers.puzzles.get_puzzle_games(mood, PUZZLE_LIMIT);
    let quick = providers.gamezop.get_mood_games(mood, PUZZLE_LIMIT).await;

    println!("Puzzles for {}", mood.label());
    println!("{:<18} {:<40} {:<10} {}", "ID", "TITLE", "LEVEL", "TIME");
    println!("{}", "-".repeat(80));
    for game in puzzles.iter().chain(quick.iter()) {
        println!(
            "{:<18} {:<40} {:<10} {}",
            game.id,
            truncate_text(&game.title, 38),
            game.difficulty.as_deref().unwrap_or("-"),
            game.duration.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

// ============================================================================
// Timer
// ============================================================================

async fn run_timer(
    mode: Option<TimerMode>,
    pomodoro: Option<u32>,
    short_break: Option<u32>,
    long_break: Option<u32>,
    save: bool,
) -> Result<()> {
    let storage = Storage::open_default()?;
    let mut settings = load_timer_settings(&storage);
    if let Some(minutes) = pomodoro {
        settings.pomodoro = minutes;
    }
    if let Some(minutes) = short_break {
        settings.short_break = minutes;
    }
    if let Some(minutes) = long_break {
        settings.long_break = minutes;
    }
    if save {
        save_timer_settings(&storage, &settings).context("Failed to save timer settings")?;
    }

    let mut timer = PomodoroTimer::new(settings);
    if let Some(mode) = mode {
        timer.switch_mode(mode);
    }
    timer.start();

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately
    interval.tick().await;

    loop {
        print!("\r{:<12} {}", timer.mode().label(), timer.format_time());
        std::io::stdout().flush().context("Failed to write to stdout")?;

        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopped with {} pomodoros completed", timer.pomodoros_completed());
                return Ok(());
            }
        }

        if let Some(done) = timer.tick() {
            println!(
                "\n{} complete. Next: {}",
                done.finished.label(),
                done.next_mode.label()
            );
            if !done.auto_start {
                break;
            }
        }
    }

    println!("Pomodoros completed: {}", timer.pomodoros_completed());
    Ok(())
}

// ============================================================================
// Config
// ============================================================================

async fn show_config() -> Result<()> {
    let cfg = config::config()?;
    let key_state = |key: &Option<String>| if key.is_some() { "set" } else { "not set" };

    println!("FlowState Configuration");
    println!("{}", "=".repeat(60));
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Storage: {}", cfg.storage_path().display());
    println!("  Site:    {}", cfg.site_dir.display());
    println!();
    println!("Providers:");
    println!("  {:<10} {}", "Deezer", cfg.deezer_base_url);
    println!("  {:<10} {} (key {})", "TMDB", cfg.tmdb_base_url, key_state(&cfg.tmdb_api_key));
    println!("  {:<10} {} (key {})", "RAWG", cfg.rawg_base_url, key_state(&cfg.rawg_api_key));
    println!(
        "  {:<10} {} (partner {})",
        "Gamezop",
        cfg.gamezop_base_url,
        key_state(&cfg.gamezop_partner_id)
    );
    println!();
    println!("HTTP timeout: {}s", cfg.timeout.as_secs());

    Ok(())
}
