use serde::{Deserialize, Serialize};
use std::fmt;

/// The three resource collections exposed by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Character,
    Location,
    Episode,
}

impl ResourceKind {
    /// Path segment of the collection endpoint, also used as the result tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Location => "location",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character, keyed by its canonical `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub url: String,

    /// Locators of the episodes this character appears in
    #[serde(rename = "episode", default)]
    pub episodes: Vec<String>,
}

/// A location, keyed by its canonical `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub url: String,

    /// Locators of the characters last seen here
    #[serde(default)]
    pub residents: Vec<String>,
}

/// An episode, keyed by its canonical `url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    pub url: String,

    /// Season/episode code such as `S01E01`
    #[serde(rename = "episode", default)]
    pub code: String,

    /// Locators of the characters appearing in this episode
    #[serde(default)]
    pub characters: Vec<String>,
}

/// One upstream record of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Character(Character),
    Location(Location),
    Episode(Episode),
}

impl Record {
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Character(_) => ResourceKind::Character,
            Self::Location(_) => ResourceKind::Location,
            Self::Episode(_) => ResourceKind::Episode,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Character(c) => c.id,
            Self::Location(l) => l.id,
            Self::Episode(e) => e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Character(c) => &c.name,
            Self::Location(l) => &l.name,
            Self::Episode(e) => &e.name,
        }
    }

    /// Canonical locator; the unique key of a record across the system
    pub fn url(&self) -> &str {
        match self {
            Self::Character(c) => &c.url,
            Self::Location(l) => &l.url,
            Self::Episode(e) => &e.url,
        }
    }

    /// Locators of the related resources (episodes of a character,
    /// residents of a location, characters of an episode)
    pub fn related(&self) -> &[String] {
        match self {
            Self::Character(c) => &c.episodes,
            Self::Location(l) => &l.residents,
            Self::Episode(e) => &e.characters,
        }
    }

    pub const fn as_character(&self) -> Option<&Character> {
        match self {
            Self::Character(c) => Some(c),
            _ => None,
        }
    }

    pub const fn as_episode(&self) -> Option<&Episode> {
        match self {
            Self::Episode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Character> for Record {
    fn from(value: Character) -> Self {
        Self::Character(value)
    }
}

impl From<Location> for Record {
    fn from(value: Location) -> Self {
        Self::Location(value)
    }
}

impl From<Episode> for Record {
    fn from(value: Episode) -> Self {
        Self::Episode(value)
    }
}

/// One page of upstream results plus the cursor of the following page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Record>,
    pub next: Option<String>,
}

impl Page {
    pub const fn new(records: Vec<Record>, next: Option<String>) -> Self {
        Self { records, next }
    }

    /// The page returned for a query the upstream does not know about
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
            next: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_deserializes_episode_list() {
        let json = r#"{
            "id": 1,
            "name": "Rick Sanchez",
            "status": "Alive",
            "url": "https://rickandmortyapi.com/api/character/1",
            "episode": [
                "https://rickandmortyapi.com/api/episode/1",
                "https://rickandmortyapi.com/api/episode/2"
            ]
        }"#;

        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.id, 1);
        assert_eq!(character.name, "Rick Sanchez");
        assert_eq!(character.episodes.len(), 2);
    }

    #[test]
    fn test_episode_keeps_code_and_characters_apart() {
        let json = r#"{
            "id": 1,
            "name": "Pilot",
            "air_date": "December 2, 2013",
            "episode": "S01E01",
            "characters": ["https://rickandmortyapi.com/api/character/1"],
            "url": "https://rickandmortyapi.com/api/episode/1"
        }"#;

        let episode: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(episode.code, "S01E01");
        assert_eq!(episode.characters.len(), 1);
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::from(Location {
            id: 3,
            name: "Citadel of Ricks".to_string(),
            url: "https://rickandmortyapi.com/api/location/3".to_string(),
            residents: vec!["https://rickandmortyapi.com/api/character/8".to_string()],
        });

        assert_eq!(record.kind(), ResourceKind::Location);
        assert_eq!(record.id(), 3);
        assert_eq!(record.name(), "Citadel of Ricks");
        assert_eq!(record.url(), "https://rickandmortyapi.com/api/location/3");
        assert_eq!(record.related().len(), 1);
        assert!(record.as_character().is_none());
        assert!(record.as_episode().is_none());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ResourceKind::Character.to_string(), "character");
        assert_eq!(ResourceKind::Location.to_string(), "location");
        assert_eq!(ResourceKind::Episode.to_string(), "episode");
    }
}
