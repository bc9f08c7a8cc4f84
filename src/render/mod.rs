//! HTML renderers for hub sections.
//!
//! Each renderer turns a slice of normalized items into an HTML fragment.
//! Pages are assembled by the hub controller with [`html::page`].
//!
//! - `music`: Deezer carousel with 30 second previews
//! - `movie`: TMDB grid with rating badges and the detail view
//! - `game`: RAWG/Gamezop/puzzle carousel with star ratings
//! - `carousel`: paging math shared by the carousels

pub mod carousel;
pub mod game;
pub mod html;
pub mod movie;
pub mod music;

pub use carousel::{cards_per_view_for_width, Carousel, Step};
pub use game::GameRenderer;
pub use movie::MovieRenderer;
pub use music::MusicRenderer;

/// Cards shown per carousel view when no viewport width is known
pub const DEFAULT_CARDS_PER_VIEW: usize = 4;

/// Common interface of the section renderers
pub trait Renderer {
    type Item;

    /// Render items, or the empty state for an empty slice
    fn render(&self, items: &[Self::Item]) -> String;

    fn render_loading_state(&self) -> String;

    fn render_empty_state(&self) -> String;

    fn render_error_state(&self, message: &str) -> String;
}

pub(crate) fn loading_state(message: &str) -> String {
    format!(
        r#"<div class="loading-state">
    <div class="loading-spinner" aria-hidden="true"></div>
    <p>{}</p>
</div>"#,
        html::escape_html(message)
    )
}

pub(crate) fn empty_state(heading: &str, message: &str) -> String {
    format!(
        r#"<div class="empty-state">
    <h3>{}</h3>
    <p>{}</p>
</div>"#,
        html::escape_html(heading),
        html::escape_html(message)
    )
}

pub(crate) fn error_state(heading: &str, message: &str) -> String {
    format!(
        r#"<div class="error-state">
    <h3>{}</h3>
    <p>{}</p>
</div>"#,
        html::escape_html(heading),
        html::escape_html(message)
    )
}

/// `aria-pressed` and class suffix for a toggle button
pub(crate) fn pressed(active: bool) -> (&'static str, &'static str) {
    if active {
        ("true", " is-active")
    } else {
        ("false", "")
    }
}
