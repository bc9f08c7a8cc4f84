//! Static catalog of daily web puzzles (Wordle, Sudoku and friends).

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::TtlCache;
use crate::domain::{Game, GameSource, Mood};

pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

struct PuzzleEntry {
    id: &'static str,
    title: &'static str,
    image: &'static str,
    rating: f64,
    rating_count: u64,
    metacritic: Option<u32>,
    released: &'static str,
    genres: &'static [&'static str],
    tags: &'static [&'static str],
    description: &'static str,
    link: &'static str,
    slug: &'static str,
    moods: &'static [Mood],
    difficulty: &'static str,
}

const CATALOG: [PuzzleEntry; 5] = [
    PuzzleEntry {
        id: "wordle-original",
        title: "Wordle",
        image: "https://fossbytes.com/wp-content/uploads/2025/08/wordle-image.jpg",
        rating: 4.8,
        rating_count: 50000,
        metacritic: Some(90),
        released: "2021-10-01",
        genres: &["Puzzle", "Word Game"],
        tags: &["Daily Challenge", "Word Puzzle", "Logic", "Minimalist", "Brain Training"],
        description: "Guess the 5-letter word in 6 tries. A new puzzle is available each day.",
        link: "https://www.nytimes.com/games/wordle/index.html",
        slug: "wordle",
        moods: &[Mood::Focus, Mood::Relax, Mood::Creative],
        difficulty: "Medium",
    },
    PuzzleEntry {
        id: "web-sudoku",
        title: "Web Sudoku",
        image: "https://cdn-1.webcatalog.io/catalog/web-sudoku/web-sudoku-icon-unplated.png?v=1722606575382",
        rating: 4.5,
        rating_count: 50000,
        metacritic: None,
        released: "2006-01-01",
        genres: &["Puzzle", "Logic"],
        tags: &["Logic", "Numbers", "Classic", "Brain Training", "Strategy"],
        description: "Billions of free Sudoku puzzles to play online with different difficulty levels.",
        link: "https://www.websudoku.com/",
        slug: "web-sudoku",
        moods: &[Mood::Focus, Mood::Relax],
        difficulty: "Variable",
    },
    PuzzleEntry {
        id: "sudoku-evil",
        title: "Evil Sudoku",
        image: "https://www.sudoku.name/pictures/head2.png",
        rating: 4.6,
        rating_count: 8000,
        metacritic: None,
        released: "2008-01-01",
        genres: &["Puzzle", "Logic"],
        tags: &["Logic", "Challenging", "Expert", "Brain Training", "Strategy"],
        description: "Extremely difficult Sudoku puzzles for expert players.",
        link: "https://www.sudoku.name/rules/en",
        slug: "sudoku-evil",
        moods: &[Mood::Focus, Mood::Energize],
        difficulty: "Expert",
    },
    PuzzleEntry {
        id: "connections",
        title: "NYT Connections",
        image: "https://imageio.forbes.com/specials-images/imageserve/683b1d1f4ef48396311bfdb8/NYT-Connections-og-image/0x0.jpg?format=jpg&crop=791,371,x0,y38,safe&width=960",
        rating: 4.6,
        rating_count: 25000,
        metacritic: None,
        released: "2023-06-12",
        genres: &["Puzzle", "Word Game"],
        tags: &["Word Puzzle", "Categories", "Daily Challenge", "Logic", "Brain Training"],
        description: "Group words into categories. Find the common thread in each group.",
        link: "https://www.nytimes.com/games/connections",
        slug: "connections",
        moods: &[Mood::Focus, Mood::Creative, Mood::Relax],
        difficulty: "Medium",
    },
    PuzzleEntry {
        id: "spelling-bee",
        title: "NYT Spelling Bee",
        image: "https://www.digitaltrends.com/wp-content/uploads/2024/05/nyt-spelling-bee.jpg",
        rating: 4.8,
        rating_count: 40000,
        metacritic: Some(88),
        released: "2018-05-09",
        genres: &["Puzzle", "Word Game"],
        tags: &["Word Puzzle", "Vocabulary", "Daily Challenge", "Creative", "Brain Training"],
        description: "Create words using 7 letters. How many words can you make?",
        link: "https://www.nytimes.com/puzzles/spelling-bee",
        slug: "spelling-bee",
        moods: &[Mood::Focus, Mood::Creative, Mood::Relax],
        difficulty: "Medium",
    },
];

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn to_game(e: &PuzzleEntry, mood: Option<Mood>) -> Game {
    Game {
        id: e.id.to_string(),
        source: GameSource::Puzzle,
        title: e.title.to_string(),
        image: Some(e.image.to_string()),
        rating: e.rating,
        rating_count: e.rating_count,
        metacritic: e.metacritic,
        released: Some(e.released.to_string()),
        genres: strings(e.genres),
        tags: strings(e.tags),
        platforms: vec!["Web".to_string()],
        categories: Vec::new(),
        playtime: None,
        esrb_rating: "E".to_string(),
        short_description: e.description.to_string(),
        link: e.link.to_string(),
        slug: Some(e.slug.to_string()),
        difficulty: Some(e.difficulty.to_string()),
        duration: None,
        plays: None,
        screenshots: Vec::new(),
        mood,
    }
}

/// Built-in puzzle list with a one hour result cache
pub struct PuzzleCatalog {
    cache: TtlCache<Vec<Game>>,
}

impl Default for PuzzleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleCatalog {
    pub fn new() -> Self {
        Self {
            cache: TtlCache::new(CACHE_TTL),
        }
    }

    /// Puzzles tagged with `mood`, highest rated first.
    ///
    /// A mood with no puzzles gets the default (focus) list.
    pub fn get_puzzle_games(&self, mood: Mood, limit: usize) -> Vec<Game> {
        let key = format!("puzzles_{}_{}", mood, limit);
        if let Some(cached) = self.cache.get(&key) {
            debug!(%mood, "Returning cached puzzles");
            return cached;
        }

        let mut puzzles: Vec<Game> = CATALOG
            .iter()
            .filter(|p| p.moods.contains(&mood))
            .map(|p| to_game(p, Some(mood)))
            .collect();
        puzzles.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        if puzzles.is_empty() {
            warn!(%mood, "No puzzles for mood, using default list");
            puzzles = fallback_puzzles(mood);
        }
        puzzles.truncate(limit);

        self.cache.insert(key, puzzles.clone());
        puzzles
    }

    /// One catalog entry by id
    pub fn puzzle_details(&self, id: &str) -> Option<Game> {
        CATALOG.iter().find(|p| p.id == id).map(|p| to_game(p, None))
    }

    /// Every catalog entry, in catalog order
    pub fn all(&self) -> Vec<Game> {
        CATALOG.iter().map(|p| to_game(p, None)).collect()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// The default puzzle pair, tagged with the requested mood
pub fn fallback_puzzles(mood: Mood) -> Vec<Game> {
    let wordle = PuzzleEntry {
        id: "wordle-fallback",
        title: "Wordle",
        image: "https://fossbytes.com/wp-content/uploads/2025/08/wordle-image.jpg",
        rating: 4.8,
        rating_count: 0,
        metacritic: None,
        released: "2021-10-01",
        genres: &["Puzzle", "Word Game"],
        tags: &["Daily Challenge", "Word Puzzle", "Logic"],
        description: "Guess the 5-letter word in 6 tries.",
        link: "https://www.nytimes.com/games/wordle/index.html",
        slug: "wordle",
        moods: &[Mood::Focus],
        difficulty: "Medium",
    };
    let sudoku = PuzzleEntry {
        id: "sudoku-fallback",
        title: "Sudoku",
        image: "https://images.unsplash.com/photo-1590486803833-1c5dc8ddd4c8?w=800&h=600&fit=crop",
        rating: 4.7,
        rating_count: 0,
        metacritic: None,
        released: "2006-01-01",
        genres: &["Puzzle", "Logic"],
        tags: &["Logic", "Numbers", "Brain Training"],
        description: "Fill the grid with numbers 1-9 following Sudoku rules.",
        link: "https://sudoku.com/",
        slug: "sudoku",
        moods: &[Mood::Focus],
        difficulty: "Variable",
    };
    vec![to_game(&wordle, Some(mood)), to_game(&sudoku, Some(mood))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_and_sort() {
        let catalog = PuzzleCatalog::new();
        let puzzles = catalog.get_puzzle_games(Mood::Relax, 6);
        let ids: Vec<_> = puzzles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        assert!(puzzles.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert!(!ids.contains(&"sudoku-evil"));
    }

    #[test]
    fn test_limit_and_cache() {
        let catalog = PuzzleCatalog::new();
        assert_eq!(catalog.get_puzzle_games(Mood::Focus, 2).len(), 2);
        assert_eq!(catalog.get_puzzle_games(Mood::Focus, 2).len(), 2);
    }

    #[test]
    fn test_mood_without_puzzles_uses_default() {
        let catalog = PuzzleCatalog::new();
        let puzzles = catalog.get_puzzle_games(Mood::Melancholy, 6);
        assert_eq!(puzzles[0].id, "wordle-fallback");
        assert_eq!(puzzles[0].mood, Some(Mood::Melancholy));
    }

    #[test]
    fn test_details() {
        let catalog = PuzzleCatalog::new();
        assert_eq!(catalog.puzzle_details("connections").unwrap().title, "NYT Connections");
        assert!(catalog.puzzle_details("chess").is_none());
    }
}
