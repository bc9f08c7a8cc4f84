//! Deezer music carousel.

use std::collections::HashSet;

use super::carousel::{Carousel, Step};
use super::html::escape_html;
use super::{empty_state, error_state, loading_state, pressed, Renderer, DEFAULT_CARDS_PER_VIEW};
use crate::domain::{MusicItem, MusicKind};

/// Previews stop after this many seconds
pub const PREVIEW_LIMIT_SECS: u32 = 30;

const NO_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='300' height='300'%3E%3Crect fill='%23282D35' width='300' height='300'/%3E%3Ctext x='50%25' y='50%25' text-anchor='middle' dy='.3em' fill='%23898A85' font-family='sans-serif' font-size='20'%3ENo Image%3C/text%3E%3C/svg%3E";

#[derive(Debug, Clone, Default)]
pub struct MusicRenderer {
    favorites: HashSet<String>,
    per_view: Option<usize>,
}

impl MusicRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids rendered with a pressed favorite button
    pub fn with_favorites(mut self, favorites: HashSet<String>) -> Self {
        self.favorites = favorites;
        self
    }

    pub fn with_cards_per_view(mut self, per_view: usize) -> Self {
        self.per_view = Some(per_view);
        self
    }

    fn card(&self, item: &MusicItem) -> String {
        let title = escape_html(&item.title);
        let image = if item.image.is_empty() {
            NO_IMAGE.to_string()
        } else {
            escape_html(&item.image)
        };
        let badge = match item.kind {
            MusicKind::Playlist => r#"<span class="content-card__badge">Playlist</span>"#,
            MusicKind::Album => r#"<span class="content-card__badge">Album</span>"#,
            MusicKind::Track => "",
        };
        let preview = item
            .preview
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| {
                format!(
                    r#"<audio class="content-card__preview" preload="none" controls src="{}" data-preview-limit="{}"></audio>"#,
                    escape_html(p),
                    PREVIEW_LIMIT_SECS
                )
            })
            .unwrap_or_default();
        let tracks = if item.track_count > 0 {
            format!(
                r#"<span class="content-card__meta-item">{} tracks</span>"#,
                item.track_count
            )
        } else {
            String::new()
        };
        let (aria, class) = pressed(self.favorites.contains(&item.id));

        format!(
            r#"<article class="content-card content-card--music" data-type="{kind}" data-id="{id}">
    <div class="content-card__image-wrapper">
        <img src="{image}" alt="{title}" class="content-card__image" loading="lazy">
        {badge}
        {preview}
    </div>
    <div class="content-card__content">
        <h3 class="content-card__title">{title}</h3>
        <div class="content-card__meta">
            <span class="content-card__meta-item">{byline}</span>
            {tracks}
        </div>
        <div class="content-card__actions">
            <a href="{link}" target="_blank" rel="noopener noreferrer" class="content-card__btn content-card__btn--primary">Listen on Deezer</a>
            <button class="content-card__btn content-card__btn--secondary{class}" aria-label="Add to favorites" aria-pressed="{aria}" data-action="favorite" data-item-id="{id}">&#9829;</button>
        </div>
    </div>
</article>"#,
            kind = item.kind.as_str(),
            id = escape_html(&item.id),
            image = image,
            title = title,
            badge = badge,
            preview = preview,
            byline = escape_html(item.byline()),
            tracks = tracks,
            link = escape_html(&item.link),
            class = class,
            aria = aria,
        )
    }
}

impl Renderer for MusicRenderer {
    type Item = MusicItem;

    fn render(&self, items: &[MusicItem]) -> String {
        if items.is_empty() {
            return self.render_empty_state();
        }

        let carousel = Carousel::new(
            items.len(),
            self.per_view.unwrap_or(DEFAULT_CARDS_PER_VIEW),
            Step::Card,
        );
        let cards: Vec<String> = items.iter().map(|i| self.card(i)).collect();
        format!(
            r#"<div class="music-carousel" data-per-view="{per_view}">
<button class="music-carousel__nav music-carousel__nav--prev" aria-label="Previous music items"{prev}>&#8249;</button>
<div class="music-carousel__wrapper">
{cards}
</div>
<button class="music-carousel__nav music-carousel__nav--next" aria-label="Next music items"{next}>&#8250;</button>
</div>"#,
            per_view = carousel.per_view(),
            prev = if carousel.can_prev() { "" } else { " disabled" },
            next = if carousel.can_next() { "" } else { " disabled" },
            cards = cards.join("\n"),
        )
    }

    fn render_loading_state(&self) -> String {
        loading_state("Loading music recommendations...")
    }

    fn render_empty_state(&self) -> String {
        empty_state("No music found", "Try a different mood or check back later.")
    }

    fn render_error_state(&self, message: &str) -> String {
        error_state("Unable to load music", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::fixtures;

    #[test]
    fn test_empty_renders_empty_state() {
        assert!(MusicRenderer::new().render(&[]).contains("empty-state"));
    }

    #[test]
    fn test_preview_audio_is_lazy_and_limited() {
        let html = MusicRenderer::new().render(&[fixtures::track("1")]);
        assert!(html.contains(r#"preload="none""#));
        assert!(html.contains(r#"data-preview-limit="30""#));
    }

    #[test]
    fn test_no_audio_without_preview() {
        let mut track = fixtures::track("1");
        track.preview = None;
        assert!(!MusicRenderer::new().render(&[track]).contains("<audio"));
    }

    #[test]
    fn test_favorite_pressed_state() {
        let favorites: HashSet<String> = ["2".to_string()].into_iter().collect();
        let html = MusicRenderer::new()
            .with_favorites(favorites)
            .render(&[fixtures::track("1"), fixtures::track("2")]);
        assert_eq!(html.matches(r#"aria-pressed="true""#).count(), 1);
        assert_eq!(html.matches(r#"aria-pressed="false""#).count(), 1);
    }

    #[test]
    fn test_prev_disabled_at_start() {
        let items: Vec<_> = (0..6).map(|i| fixtures::track(&i.to_string())).collect();
        let html = MusicRenderer::new().render(&items);
        assert!(html.contains(r#"music-carousel__nav--prev" aria-label="Previous music items" disabled"#));
        assert!(!html.contains(r#"Next music items" disabled"#));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut track = fixtures::track("1");
        track.title = "<script>".to_string();
        let html = MusicRenderer::new().render(&[track]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
