//! Game carousel for RAWG, Gamezop and puzzle entries.

use std::collections::HashSet;

use super::carousel::{Carousel, Step};
use super::html::{escape_html, mood_placeholder, star_rating};
use super::{empty_state, error_state, loading_state, pressed, Renderer, DEFAULT_CARDS_PER_VIEW};
use crate::domain::{Game, GameSource, Mood};

#[derive(Debug, Clone, Default)]
pub struct GameRenderer {
    favorites: HashSet<String>,
    mood: Option<Mood>,
    per_view: Option<usize>,
}

impl GameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hub mood, used for placeholders when a game carries none
    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_favorites(mut self, favorites: HashSet<String>) -> Self {
        self.favorites = favorites;
        self
    }

    pub fn with_cards_per_view(mut self, per_view: usize) -> Self {
        self.per_view = Some(per_view);
        self
    }

    fn image(&self, game: &Game) -> String {
        match game.image.as_deref().filter(|i| !i.is_empty()) {
            Some(image) => escape_html(image),
            None => mood_placeholder(game.mood.or(self.mood)),
        }
    }

    fn tags(tags: &[String], limit: usize) -> String {
        tags.iter()
            .take(limit)
            .map(|t| format!(r#"<span class="game-card__tag">{}</span>"#, escape_html(t)))
            .collect()
    }

    fn card(&self, game: &Game) -> String {
        let title = escape_html(&game.title);
        let metacritic = game
            .metacritic
            .map(|m| {
                format!(
                    r#"<div class="game-card__metacritic" aria-label="Metacritic score: {m}"><span class="game-card__metacritic-score">{m}</span></div>"#,
                    m = m
                )
            })
            .unwrap_or_default();

        let mut meta = Vec::new();
        if let Some(year) = game.release_year() {
            meta.push(format!(
                r#"<span class="game-card__meta-item">{}</span>"#,
                escape_html(year)
            ));
        }
        if let Some(hours) = game.playtime.filter(|h| *h > 0) {
            meta.push(format!(
                r#"<span class="game-card__meta-item">{}h avg</span>"#,
                hours
            ));
        }
        if !game.esrb_rating.is_empty() && game.esrb_rating != "Not Rated" {
            meta.push(format!(
                r#"<span class="game-card__meta-item game-card__meta-item--esrb">{}</span>"#,
                escape_html(&game.esrb_rating)
            ));
        }
        let (aria, class) = pressed(self.favorites.contains(&game.id));

        format!(
            r#"<article class="game-card" data-game-id="{id}" data-source="{source}">
    <div class="game-card__image-container">
        <img src="{image}" alt="{title}" class="game-card__image" loading="lazy">
        {metacritic}
    </div>
    <div class="game-card__content">
        <div class="game-card__header">
            <h3 class="game-card__title">{title}</h3>
            <div class="game-card__rating" aria-label="Rating: {rating:.1} out of 5">{stars}<span class="game-card__rating-value">{rating:.1}</span></div>
        </div>
        <div class="game-card__tags">{tags}</div>
        <p class="game-card__description">{description}</p>
        <div class="game-card__meta">{meta}</div>
        <div class="game-card__actions">
            <a href="{link}" target="_blank" rel="noopener noreferrer" class="game-card__btn game-card__btn--primary">Play Game</a>
            <button class="game-card__btn game-card__btn--secondary" aria-label="More info about {title}" data-action="info" data-item-id="{id}">i</button>
            <button class="game-card__btn game-card__btn--secondary{class}" aria-label="Add to favorites" aria-pressed="{aria}" data-action="favorite" data-item-id="{id}">&#9829;</button>
        </div>
    </div>
</article>"#,
            id = escape_html(&game.id),
            source = source_label(game),
            image = self.image(game),
            title = title,
            metacritic = metacritic,
            rating = game.rating,
            stars = star_rating(game.rating),
            tags = Self::tags(&game.tags, 3),
            description = escape_html(&game.short_description),
            meta = meta.join(""),
            link = escape_html(&game.link),
            class = class,
            aria = aria,
        )
    }

    /// Info panel with genres, release date, playtime and every tag
    pub fn render_info(&self, game: &Game) -> String {
        let mut details = Vec::new();
        if !game.genres.is_empty() {
            details.push(format!(
                r#"<div class="game-modal__detail"><strong>Genres:</strong> <span>{}</span></div>"#,
                escape_html(&game.genres.join(", "))
            ));
        }
        if let Some(released) = game.released.as_deref().filter(|r| !r.is_empty()) {
            details.push(format!(
                r#"<div class="game-modal__detail"><strong>Released:</strong> <span>{}</span></div>"#,
                escape_html(released)
            ));
        }
        if let Some(hours) = game.playtime.filter(|h| *h > 0) {
            details.push(format!(
                r#"<div class="game-modal__detail"><strong>Average Playtime:</strong> <span>{} hours</span></div>"#,
                hours
            ));
        }
        if !game.platforms.is_empty() {
            details.push(format!(
                r#"<div class="game-modal__detail"><strong>Platforms:</strong> <span>{}</span></div>"#,
                escape_html(&game.platforms.join(", "))
            ));
        }
        if let Some(difficulty) = game.difficulty.as_deref() {
            details.push(format!(
                r#"<div class="game-modal__detail"><strong>Difficulty:</strong> <span>{}</span></div>"#,
                escape_html(difficulty)
            ));
        }

        format!(
            r#"<div class="game-modal" data-game-id="{id}">
    <div class="game-modal__header">
        <img src="{image}" alt="{title}" class="game-modal__image">
        <div class="game-modal__header-content">
            <h2 class="game-modal__title">{title}</h2>
            <div class="game-modal__rating">{stars}<span>{rating:.1} / 5.0</span></div>
        </div>
    </div>
    <div class="game-modal__body">
        <p class="game-modal__description">{description}</p>
        <div class="game-modal__details">{details}</div>
        <div class="game-modal__tags">{tags}</div>
    </div>
    <div class="game-modal__footer">
        <a href="{link}" target="_blank" rel="noopener noreferrer" class="game-card__btn game-card__btn--primary">Play Game</a>
    </div>
</div>"#,
            id = escape_html(&game.id),
            image = self.image(game),
            title = escape_html(&game.title),
            stars = star_rating(game.rating),
            rating = game.rating,
            description = escape_html(&game.short_description),
            details = details.join("\n"),
            tags = Self::tags(&game.tags, game.tags.len()),
            link = escape_html(&game.link),
        )
    }
}

fn source_label(game: &Game) -> &'static str {
    match game.source {
        GameSource::Rawg => "rawg",
        GameSource::Gamezop => "gamezop",
        GameSource::Puzzle => "puzzle",
    }
}

impl Renderer for GameRenderer {
    type Item = Game;

    fn render(&self, items: &[Game]) -> String {
        if items.is_empty() {
            return self.render_empty_state();
        }

        let carousel = Carousel::new(
            items.len(),
            self.per_view.unwrap_or(DEFAULT_CARDS_PER_VIEW),
            Step::Page,
        );
        let cards: Vec<String> = items.iter().map(|g| self.card(g)).collect();
        let indicators: Vec<String> = (0..carousel.page_count())
            .map(|page| {
                let active = page == carousel.current_page();
                format!(
                    r#"<button class="game-carousel__indicator{}" role="tab" aria-selected="{}" aria-label="Go to page {}"></button>"#,
                    if active { " game-carousel__indicator--active" } else { "" },
                    active,
                    page + 1
                )
            })
            .collect();

        format!(
            r#"<div class="game-carousel" data-per-view="{per_view}">
<button class="game-carousel__nav game-carousel__nav--prev" aria-label="Previous games"{prev}>&#8249;</button>
<div class="game-carousel__viewport"><div class="game-carousel__track">
{cards}
</div></div>
<button class="game-carousel__nav game-carousel__nav--next" aria-label="Next games"{next}>&#8250;</button>
</div>
<div class="game-carousel__indicators" role="tablist" aria-label="Game carousel pages">
{indicators}
</div>"#,
            per_view = carousel.per_view(),
            prev = if carousel.can_prev() { "" } else { " disabled" },
            next = if carousel.can_next() { "" } else { " disabled" },
            cards = cards.join("\n"),
            indicators = indicators.join("\n"),
        )
    }

    fn render_loading_state(&self) -> String {
        loading_state("Loading game recommendations...")
    }

    fn render_empty_state(&self) -> String {
        empty_state("No games found", "Check back later for game recommendations.")
    }

    fn render_error_state(&self, message: &str) -> String {
        error_state("Unable to load games", message)
    }
}
