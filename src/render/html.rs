//! Shared HTML helpers: escaping, ratings, placeholders and the page shell.

use crate::config::paths;
use crate::domain::Mood;

/// Escape text for element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Ratings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Five stars for a 0-5 rating; a fraction of .5 or more adds a half star
pub fn stars(rating: f64) -> [Star; 5] {
    let rating = rating.clamp(0.0, 5.0);
    let full = rating.floor() as usize;
    let half = rating.fract() >= 0.5;

    let mut out = [Star::Empty; 5];
    for (i, star) in out.iter_mut().enumerate() {
        if i < full {
            *star = Star::Full;
        } else if i == full && half {
            *star = Star::Half;
        }
    }
    out
}

pub fn star_rating(rating: f64) -> String {
    stars(rating)
        .iter()
        .map(|s| {
            let class = match s {
                Star::Full => "full",
                Star::Half => "half",
                Star::Empty => "empty",
            };
            format!(r#"<span class="game-card__star game-card__star--{}">★</span>"#, class)
        })
        .collect()
}

/// Badge tier for a 0-10 vote average
pub fn rating_tier(rating: f64) -> &'static str {
    if rating >= 8.0 {
        "excellent"
    } else if rating >= 7.0 {
        "good"
    } else if rating >= 6.0 {
        "average"
    } else {
        "low"
    }
}

/// Thousands separators, e.g. `12,345`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Placeholders
// ============================================================================

/// Accent colour of a mood
pub fn mood_color(mood: Mood) -> &'static str {
    match mood {
        Mood::Focus => "#D93535",
        Mood::Relax => "#B9C9A8",
        Mood::Energize => "#E8A419",
        Mood::Creative => "#9C73CC",
        Mood::Melancholy => "#6B8AA6",
    }
}

/// Inline SVG game placeholder in the mood's colour; focus when no mood is known
pub fn mood_placeholder(mood: Option<Mood>) -> String {
    let mood = mood.unwrap_or(Mood::Focus);
    let color = mood_color(mood).trim_start_matches('#');
    format!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='300'%3E\
         %3Crect fill='%23{color}' width='400' height='300'/%3E\
         %3Ctext x='50%25' y='50%25' text-anchor='middle' dy='.3em' fill='white' \
         font-family='sans-serif' font-size='24'%3E{label} Game%3C/text%3E%3C/svg%3E",
        color = color,
        label = mood.label(),
    )
}

// ============================================================================
// Page shell
// ============================================================================

/// A titled section wrapping renderer output
pub fn section(id: &str, heading: &str, inner: &str) -> String {
    format!(
        "<section class=\"hub-section\" id=\"{id}\">\n<h2 class=\"hub-section__title\">{heading}</h2>\n{inner}\n</section>",
        id = id,
        heading = escape_html(heading),
        inner = inner,
    )
}

/// Full HTML document with the mood navigation
pub fn page(title: &str, mood: Option<Mood>, body: &str) -> String {
    let nav: Vec<String> = Mood::ALL
        .iter()
        .map(|m| {
            let active = if Some(*m) == mood { " nav__link--active" } else { "" };
            format!(
                r#"<a class="nav__link{}" href="{}">{}</a>"#,
                active,
                paths::hub_page_name(*m),
                m.label()
            )
        })
        .collect();

    let data_mood = mood.map(|m| m.as_str()).unwrap_or("none");
    let accent = mood.map(mood_color).unwrap_or("#282D35");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | FlowState</title>
<style>:root {{ --mood-accent: {accent}; }}</style>
</head>
<body data-mood="{data_mood}">
<nav class="nav">
{nav}
<a class="nav__link" href="{watchlist}">Watchlist</a>
</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        accent = accent,
        data_mood = data_mood,
        nav = nav.join("\n"),
        watchlist = paths::WATCHLIST_PAGE,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_star_rating_always_five() {
        for rating in [0.0, 2.5, 4.49, 4.5, 5.0, 7.0, -1.0] {
            assert_eq!(star_rating(rating).matches('★').count(), 5);
        }
    }

    #[test]
    fn test_half_star() {
        assert_eq!(
            stars(3.5),
            [Star::Full, Star::Full, Star::Full, Star::Half, Star::Empty]
        );
        assert_eq!(
            stars(3.4),
            [Star::Full, Star::Full, Star::Full, Star::Empty, Star::Empty]
        );
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(rating_tier(8.0), "excellent");
        assert_eq!(rating_tier(7.9), "good");
        assert_eq!(rating_tier(6.0), "average");
        assert_eq!(rating_tier(5.9), "low");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_mood_placeholder_colour() {
        let svg = mood_placeholder(Some(Mood::Creative));
        assert!(svg.starts_with("data:image/svg+xml"));
        assert!(svg.contains("9C73CC"));
        assert!(mood_placeholder(None).contains("D93535"));
    }

    #[test]
    fn test_page_marks_active_mood() {
        let html = page("Relax", Some(Mood::Relax), "<p>hi</p>");
        assert!(html.contains(r#"class="nav__link nav__link--active" href="relax.html""#));
        assert!(html.contains(r#"data-mood="relax""#));
        assert!(html.contains("<p>hi</p>"));
    }
}
