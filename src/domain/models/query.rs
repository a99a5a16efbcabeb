//! Query bounds and the output shapes of the two reports

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::record::{Character, ResourceKind};

/// Either no bound at all or an inclusive non-negative bound.
///
/// Used for result limits as well as for co-occurrence count filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    #[default]
    Unbounded,
    At(usize),
}

impl Bound {
    /// Interpret a signed value where any negative number means unbounded
    pub fn from_signed(value: i64) -> Self {
        usize::try_from(value).map_or(Self::Unbounded, Self::At)
    }

    pub const fn value(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::At(n) => Some(n),
        }
    }

    /// True unless `count` is below this bound used as a minimum
    pub fn admits_min(self, count: usize) -> bool {
        self.value().is_none_or(|min| count >= min)
    }

    /// True unless `count` is above this bound used as a maximum
    pub fn admits_max(self, count: usize) -> bool {
        self.value().is_none_or(|max| count <= max)
    }

    /// Cut `items` down to this bound used as a limit
    pub fn truncate<T>(self, items: &mut Vec<T>) {
        if let Self::At(limit) = self {
            items.truncate(limit);
        }
    }
}

impl From<Option<usize>> for Bound {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Unbounded, Self::At)
    }
}

/// One entry of a cross-resource name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub url: String,
}

/// Unordered pair of two distinct character locators.
///
/// The smaller locator is always stored first so `(a, b)` and `(b, a)` are
/// the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Returns `None` for a self-pair
    pub fn new(a: &str, b: &str) -> Option<Self> {
        let (first, second) = match a.cmp(b) {
            Ordering::Less => (a, b),
            Ordering::Greater => (b, a),
            Ordering::Equal => return None,
        };
        Some(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Name and locator of a character inside a pair report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    pub name: String,
    pub url: String,
}

impl From<&Character> for CharacterRef {
    fn from(character: &Character) -> Self {
        Self {
            name: character.name.clone(),
            url: character.url.clone(),
        }
    }
}

/// Two characters and the number of episodes they share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairResult {
    pub character1: CharacterRef,
    pub character2: CharacterRef,
    pub episodes: usize,
}
