//! Static mood → provider query tables.
//!
//! Every provider maps a [`Mood`] to its own search terms. The tables are
//! exhaustive matches so a new mood cannot be added without a query set.

use super::mood::Mood;

/// Deezer search terms for a mood
#[derive(Debug, Clone, Copy)]
pub struct MusicQueries {
    pub playlists: &'static [&'static str],
    pub albums: &'static [&'static str],
    pub tracks: &'static [&'static str],
    pub description: &'static str,
}

/// TMDB discovery criteria for a mood
#[derive(Debug, Clone, Copy)]
pub struct MovieQueries {
    /// TMDB genre ids
    pub genres: &'static [u32],
    /// Free-text keywords; the first one drives a keyword search
    pub keywords: &'static [&'static str],
    pub sort_by: &'static str,
    pub description: &'static str,
}

/// Game criteria shared by RAWG (slugs) and Gamezop (substring matching)
#[derive(Debug, Clone, Copy)]
pub struct GameQueries {
    pub tags: &'static [&'static str],
    pub genres: &'static [&'static str],
    pub exclude_tags: &'static [&'static str],
    /// Gamezop category hints
    pub categories: &'static [&'static str],
    /// Gamezop difficulty hint ("easy", "medium", "hard")
    pub difficulty: Option<&'static str>,
    pub sort_by: &'static str,
}

/// TMDB genre ids used by the mood tables
pub mod tmdb_genres {
    pub const ACTION: u32 = 28;
    pub const ADVENTURE: u32 = 12;
    pub const ANIMATION: u32 = 16;
    pub const COMEDY: u32 = 35;
    pub const DOCUMENTARY: u32 = 99;
    pub const DRAMA: u32 = 18;
    pub const FAMILY: u32 = 10751;
    pub const FANTASY: u32 = 14;
    pub const HISTORY: u32 = 36;
    pub const MUSIC: u32 = 10402;
    pub const MYSTERY: u32 = 9648;
    pub const ROMANCE: u32 = 10749;
    pub const SCIENCE_FICTION: u32 = 878;
}

pub fn music_queries(mood: Mood) -> MusicQueries {
    match mood {
        Mood::Focus => MusicQueries {
            playlists: &[
                "instrumental focus",
                "deep concentration",
                "study music",
                "ambient focus",
                "binaural beats",
                "lo-fi instrumental",
                "classical focus",
                "white noise",
            ],
            albums: &[
                "ambient",
                "classical instrumental",
                "electronic instrumental",
                "jazz instrumental",
                "piano solo",
            ],
            tracks: &["lofi study", "ambient piano", "instrumental beats"],
            description: "Instrumental and ambient tracks to enhance concentration",
        },
        Mood::Relax => MusicQueries {
            playlists: &[
                "chill vibes",
                "relaxing music",
                "meditation",
                "calm piano",
                "nature sounds",
                "spa music",
                "peaceful",
                "yoga music",
            ],
            albums: &["chill out", "relaxation", "new age", "acoustic chill", "lounge"],
            tracks: &["chill acoustic", "calm piano", "ambient relax"],
            description: "Calming music and nature sounds to reduce stress",
        },
        Mood::Energize => MusicQueries {
            playlists: &[
                "workout motivation",
                "energy boost",
                "upbeat pop",
                "running music",
                "gym hits",
                "power workout",
                "dance party",
                "high energy",
            ],
            albums: &["edm", "pop hits", "rock anthems", "hip hop", "dance"],
            tracks: &["workout", "dance hits", "edm anthem"],
            description: "Upbeat music to boost motivation and energy",
        },
        Mood::Creative => MusicQueries {
            playlists: &[
                "creative flow",
                "experimental music",
                "indie discovery",
                "world music",
                "art inspiration",
                "alternative",
                "eclectic mix",
                "jazz fusion",
            ],
            albums: &["indie", "alternative", "world", "experimental", "jazz fusion"],
            tracks: &["indie electronic", "jazz fusion", "experimental"],
            description: "Experimental and artistic compositions",
        },
        Mood::Melancholy => MusicQueries {
            playlists: &[
                "sad songs",
                "melancholic",
                "emotional ballads",
                "indie folk",
                "rainy day",
                "contemplative",
                "acoustic sad",
                "heartbreak",
            ],
            albums: &[
                "sad indie",
                "melancholic folk",
                "emotional",
                "acoustic ballads",
                "singer songwriter",
            ],
            tracks: &["sad piano", "indie folk", "acoustic ballad"],
            description: "Contemplative and introspective music",
        },
    }
}

pub fn movie_queries(mood: Mood) -> MovieQueries {
    use tmdb_genres::*;

    match mood {
        Mood::Focus => MovieQueries {
            genres: &[DOCUMENTARY, HISTORY],
            keywords: &["educational", "documentary", "biography", "science", "nature"],
            sort_by: "vote_average.desc",
            description: "Educational documentaries and inspiring true stories",
        },
        Mood::Relax => MovieQueries {
            genres: &[ANIMATION, FAMILY, COMEDY],
            keywords: &["feel good", "heartwarming", "calm", "peaceful", "nature"],
            sort_by: "vote_average.desc",
            description: "Light-hearted and calming films",
        },
        Mood::Energize => MovieQueries {
            genres: &[ACTION, ADVENTURE, SCIENCE_FICTION],
            keywords: &["motivational", "inspiring", "adventure", "hero", "triumph"],
            sort_by: "popularity.desc",
            description: "High-energy action and motivational stories",
        },
        Mood::Creative => MovieQueries {
            genres: &[DRAMA, MUSIC, FANTASY],
            keywords: &["artistic", "creative", "music", "art", "imagination", "visionary"],
            sort_by: "vote_average.desc",
            description: "Artistic and thought-provoking films",
        },
        Mood::Melancholy => MovieQueries {
            genres: &[DRAMA, ROMANCE, MYSTERY],
            keywords: &["emotional", "melancholic", "introspective", "thoughtful", "bittersweet"],
            sort_by: "vote_average.desc",
            description: "Contemplative and emotional narratives",
        },
    }
}

pub fn game_queries(mood: Mood) -> GameQueries {
    match mood {
        Mood::Focus => GameQueries {
            tags: &["logic", "minimalist", "singleplayer"],
            genres: &["puzzle", "strategy"],
            exclude_tags: &["violent", "gore"],
            categories: &["puzzle", "strategy", "word"],
            difficulty: Some("medium"),
            sort_by: "-rating",
        },
        Mood::Relax => GameQueries {
            tags: &["relaxing", "atmospheric", "cute"],
            genres: &["casual", "simulation"],
            exclude_tags: &["horror", "violent", "difficult"],
            categories: &["casual", "creative"],
            difficulty: Some("easy"),
            sort_by: "-rating",
        },
        Mood::Energize => GameQueries {
            tags: &["fast-paced", "action", "arcade"],
            genres: &["action", "arcade", "racing"],
            exclude_tags: &["slow"],
            categories: &["action", "arcade", "rhythm"],
            difficulty: Some("hard"),
            sort_by: "-added",
        },
        Mood::Creative => GameQueries {
            tags: &["sandbox", "building", "crafting"],
            genres: &["simulation", "indie"],
            exclude_tags: &["violent"],
            categories: &["creative", "music"],
            difficulty: None,
            sort_by: "-rating",
        },
        Mood::Melancholy => GameQueries {
            tags: &["story-rich", "atmospheric", "emotional"],
            genres: &["adventure", "indie"],
            exclude_tags: &["multiplayer"],
            categories: &["adventure", "story"],
            difficulty: Some("easy"),
            sort_by: "-rating",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mood_has_enough_music_queries() {
        for mood in Mood::ALL {
            let q = music_queries(mood);
            assert!(q.playlists.len() >= 3, "{mood} needs at least 3 playlist queries");
            assert!(!q.albums.is_empty());
        }
    }

    #[test]
    fn test_every_mood_has_movie_keyword() {
        for mood in Mood::ALL {
            assert!(!movie_queries(mood).keywords.is_empty());
            assert!(!movie_queries(mood).genres.is_empty());
        }
    }
}
