//! The five moods every provider is keyed by.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Mood category used as the filter key across all providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Focus,
    Relax,
    Energize,
    Creative,
    Melancholy,
}

/// Returned when a label does not name one of the five moods
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl Mood {
    /// All moods, in hub order
    pub const ALL: [Mood; 5] = [
        Mood::Focus,
        Mood::Relax,
        Mood::Energize,
        Mood::Creative,
        Mood::Melancholy,
    ];

    /// Lowercase label, also used in cache keys and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Focus => "focus",
            Mood::Relax => "relax",
            Mood::Energize => "energize",
            Mood::Creative => "creative",
            Mood::Melancholy => "melancholy",
        }
    }

    /// Title-cased label for headings
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Focus => "Focus",
            Mood::Relax => "Relax",
            Mood::Energize => "Energize",
            Mood::Creative => "Creative",
            Mood::Melancholy => "Melancholy",
        }
    }

    /// Detect the hub mood from an explicit attribute or a page path.
    ///
    /// The attribute wins when it parses; otherwise the first mood name found
    /// in the path is used, defaulting to focus.
    pub fn detect(attribute: Option<&str>, path: &str) -> Mood {
        if let Some(mood) = attribute.and_then(|a| a.parse::<Mood>().ok()) {
            return mood;
        }

        let path = path.to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| path.contains(m.as_str()))
            .unwrap_or(Mood::Focus)
    }

    /// Parse a user-supplied label, logging and returning `None` when it is unknown
    pub fn from_label(label: &str) -> Option<Mood> {
        match label.parse() {
            Ok(mood) => Some(mood),
            Err(err) => {
                tracing::warn!(label, error = %err, "Ignoring unknown mood");
                None
            }
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "focus" => Ok(Mood::Focus),
            "relax" => Ok(Mood::Relax),
            "energize" => Ok(Mood::Energize),
            "creative" => Ok(Mood::Creative),
            "melancholy" => Ok(Mood::Melancholy),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

/// Deserialize an optional mood, mapping "unknown" or unrecognized labels to `None`.
///
/// Stored entries written by older versions carry `"unknown"` when no hub was active.
pub fn lenient_mood<'de, D>(deserializer: D) -> Result<Option<Mood>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_from_str() {
        assert_eq!("focus".parse::<Mood>().unwrap(), Mood::Focus);
        assert_eq!("RELAX".parse::<Mood>().unwrap(), Mood::Relax);
        assert_eq!(" melancholy ".parse::<Mood>().unwrap(), Mood::Melancholy);
        assert!("sleepy".parse::<Mood>().is_err());
    }

    #[test]
    fn test_detect_prefers_attribute() {
        assert_eq!(Mood::detect(Some("creative"), "/hubs/focus.html"), Mood::Creative);
    }

    #[test]
    fn test_detect_from_path() {
        assert_eq!(Mood::detect(None, "/hubs/energize.html"), Mood::Energize);
        assert_eq!(Mood::detect(Some("bogus"), "/Melancholy/"), Mood::Melancholy);
    }

    #[test]
    fn test_detect_defaults_to_focus() {
        assert_eq!(Mood::detect(None, "/index.html"), Mood::Focus);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Energize).unwrap(), "\"energize\"");
    }

    #[test]
    fn test_from_label_is_lenient() {
        assert_eq!(Mood::from_label("Creative"), Some(Mood::Creative));
        assert_eq!(Mood::from_label("sleepy"), None);
    }
}
