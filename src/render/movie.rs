//! TMDB movie grid and detail view.

use std::collections::HashSet;

use super::html::{escape_html, format_number, rating_tier};
use super::{empty_state, error_state, loading_state, pressed, Renderer};
use crate::adapters::MovieDetails;
use crate::domain::Movie;

#[derive(Debug, Clone, Default)]
pub struct MovieRenderer {
    watchlist: HashSet<String>,
}

impl MovieRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids rendered with a pressed watchlist button
    pub fn with_watchlist(mut self, ids: HashSet<String>) -> Self {
        self.watchlist = ids;
        self
    }

    /// Rating badge; nothing for unrated movies
    pub fn rating_badge(vote_average: Option<f64>) -> String {
        match vote_average {
            Some(v) if v > 0.0 => format!(
                r#"<div class="rating-badge rating-badge--{}">&#9733; {:.1}</div>"#,
                rating_tier(v),
                v
            ),
            _ => String::new(),
        }
    }

    fn card(&self, movie: &Movie) -> String {
        let title = escape_html(&movie.title);
        let (aria, class) = pressed(self.watchlist.contains(&movie.id));

        format!(
            r#"<article class="content-card content-card--movie" data-id="{id}">
    <div class="content-card__image-wrapper">
        <img src="{image}" alt="{title}" class="content-card__image" loading="lazy">
        {badge}
    </div>
    <div class="content-card__content">
        <h3 class="content-card__title">{title}</h3>
        <div class="content-card__meta">
            <span class="content-card__meta-item">{year}</span>
            <span class="content-card__meta-item">&#9733; {rating}</span>
        </div>
        <p class="content-card__description">{description}</p>
        <div class="content-card__actions">
            <a href="{link}" target="_blank" rel="noopener noreferrer" class="content-card__btn content-card__btn--primary">More Info</a>
            <button class="content-card__btn content-card__btn--secondary{class}" aria-label="Add to watchlist" aria-pressed="{aria}" data-action="watchlist" data-item-id="{id}">&#128278;</button>
        </div>
    </div>
</article>"#,
            id = escape_html(&movie.id),
            image = escape_html(&movie.image),
            title = title,
            badge = Self::rating_badge(movie.vote_average),
            year = escape_html(&movie.release_year),
            rating = movie.rating_label(),
            description = escape_html(&movie.description),
            link = escape_html(&movie.link),
            class = class,
            aria = aria,
        )
    }

    /// Full detail view: credits, trailer and similar titles
    pub fn render_details(&self, details: &MovieDetails) -> String {
        let movie = &details.movie;
        let backdrop = if movie.backdrop_large.is_empty() {
            &movie.image_large
        } else {
            &movie.backdrop_large
        };
        let (aria, class) = pressed(self.watchlist.contains(&movie.id));

        let tagline = if details.tagline.is_empty() {
            String::new()
        } else {
            format!(
                r#"<p class="movie-modal__tagline">{}</p>"#,
                escape_html(&details.tagline)
            )
        };
        let genres = if details.genres.is_empty() {
            String::new()
        } else {
            format!(
                r#"<span class="movie-modal__genres">{}</span>"#,
                escape_html(&details.genres.join(", "))
            )
        };
        let cast: Vec<String> = details
            .cast
            .iter()
            .map(|c| {
                format!(
                    r#"<li class="movie-modal__cast-member"><strong>{}</strong> as {}</li>"#,
                    escape_html(&c.name),
                    escape_html(&c.character)
                )
            })
            .collect();
        let trailer = details
            .trailer
            .as_deref()
            .map(|url| {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="content-card__btn">Watch Trailer</a>"#,
                    escape_html(url)
                )
            })
            .unwrap_or_default();
        let similar: Vec<String> = details
            .similar
            .iter()
            .map(|m| {
                format!(
                    r#"<li><a href="{}">{}</a> ({})</li>"#,
                    escape_html(&m.link),
                    escape_html(&m.title),
                    escape_html(&m.release_year)
                )
            })
            .collect();
        let similar = if similar.is_empty() {
            String::new()
        } else {
            format!(
                "<h3>Similar</h3>\n<ul class=\"movie-modal__similar\">\n{}\n</ul>",
                similar.join("\n")
            )
        };

        format!(
            r#"<div class="movie-modal" data-id="{id}">
    <div class="movie-modal__backdrop" style="background-image: url('{backdrop}')"></div>
    <div class="movie-modal__info">
        <div class="movie-modal__poster"><img src="{poster}" alt="{title}"></div>
        <div class="movie-modal__details">
            <h2 class="movie-modal__title">{title}</h2>
            {tagline}
            <div class="movie-modal__meta">
                <span class="movie-modal__year">{year}</span>
                <span class="movie-modal__rating">&#9733; {rating} / 10</span>
                <span class="movie-modal__votes">{votes} votes</span>
                <span class="movie-modal__runtime">{runtime}</span>
                {genres}
            </div>
            <p class="movie-modal__director">Directed by {director}</p>
            <p class="movie-modal__overview">{overview}</p>
            <ul class="movie-modal__cast">
{cast}
            </ul>
            <div class="movie-modal__actions">
                <a href="{link}" target="_blank" rel="noopener noreferrer" class="content-card__btn content-card__btn--primary">View on TMDB</a>
                {trailer}
                <button class="content-card__btn content-card__btn--secondary{class}" aria-pressed="{aria}" data-action="watchlist-modal" data-item-id="{id}">Add to Watchlist</button>
            </div>
            {similar}
        </div>
    </div>
</div>"#,
            id = escape_html(&movie.id),
            backdrop = escape_html(backdrop),
            poster = escape_html(&movie.image_large),
            title = escape_html(&movie.title),
            tagline = tagline,
            year = escape_html(&movie.release_year),
            rating = movie.rating_label(),
            votes = format_number(movie.vote_count),
            runtime = escape_html(&details.runtime),
            genres = genres,
            director = escape_html(&details.director),
            overview = escape_html(&movie.overview),
            cast = cast.join("\n"),
            link = escape_html(&movie.link),
            trailer = trailer,
            class = class,
            aria = aria,
            similar = similar,
        )
    }
}

impl Renderer for MovieRenderer {
    type Item = Movie;

    fn render(&self, items: &[Movie]) -> String {
        if items.is_empty() {
            return self.render_empty_state();
        }

        let cards: Vec<String> = items.iter().map(|m| self.card(m)).collect();
        format!(
            "<div class=\"movie-grid\">\n{}\n</div>",
            cards.join("\n")
        )
    }

    fn render_loading_state(&self) -> String {
        loading_state("Loading movie recommendations...")
    }

    fn render_empty_state(&self) -> String {
        empty_state("No movies found", "Try adjusting your mood or check back later.")
    }

    fn render_error_state(&self, message: &str) -> String {
        error_state("Oops! Something went wrong", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tmdb::CastMember;
    use crate::domain::content::fixtures;

    #[test]
    fn test_rating_badge_tiers() {
        assert!(MovieRenderer::rating_badge(Some(8.4)).contains("rating-badge--excellent"));
        assert!(MovieRenderer::rating_badge(Some(7.0)).contains("rating-badge--good"));
        assert!(MovieRenderer::rating_badge(Some(6.5)).contains("rating-badge--average"));
        assert!(MovieRenderer::rating_badge(Some(4.0)).contains("rating-badge--low"));
        assert!(MovieRenderer::rating_badge(None).is_empty());
        assert!(MovieRenderer::rating_badge(Some(0.0)).is_empty());
    }

    #[test]
    fn test_unrated_card_shows_na() {
        let html = MovieRenderer::new().render(&[fixtures::movie("1", None)]);
        assert!(html.contains("&#9733; N/A"));
        assert!(!html.contains("rating-badge"));
    }

    #[test]
    fn test_watchlist_pressed() {
        let ids: HashSet<String> = ["7".to_string()].into_iter().collect();
        let html = MovieRenderer::new()
            .with_watchlist(ids)
            .render(&[fixtures::movie("7", Some(7.5))]);
        assert!(html.contains(r#"aria-pressed="true""#));
    }

    #[test]
    fn test_render_details() {
        let details = MovieDetails {
            movie: fixtures::movie("603", Some(8.2)),
            runtime: "136 min".to_string(),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
            budget: 63_000_000,
            revenue: 463_517_383,
            status: "Released".to_string(),
            tagline: "Welcome to the Real World.".to_string(),
            homepage: String::new(),
            imdb_id: "tt0133093".to_string(),
            director: "Lana Wachowski".to_string(),
            cast: vec![CastMember {
                name: "Keanu Reeves".to_string(),
                character: "Neo".to_string(),
                profile_path: None,
            }],
            trailer: Some("https://www.youtube.com/watch?v=abc".to_string()),
            similar: vec![fixtures::movie("604", None)],
        };

        let html = MovieRenderer::new().render_details(&details);
        assert!(html.contains("Directed by Lana Wachowski"));
        assert!(html.contains("<strong>Keanu Reeves</strong> as Neo"));
        assert!(html.contains("Watch Trailer"));
        assert!(html.contains("8.2 / 10"));
        assert!(html.contains("Action, Science Fiction"));
        assert!(html.contains("Similar"));
    }
}
