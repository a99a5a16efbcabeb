use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::{Character, Episode, Record, ResourceKind};

/// Collections that are held in full by the bulk cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedCollection {
    Characters,
    Episodes,
}

impl TrackedCollection {
    pub const ALL: [Self; 2] = [Self::Characters, Self::Episodes];

    /// Upstream resource kind backing this collection
    pub const fn kind(self) -> ResourceKind {
        match self {
            Self::Characters => ResourceKind::Character,
            Self::Episodes => ResourceKind::Episode,
        }
    }
}

impl fmt::Display for TrackedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Characters => f.write_str("characters"),
            Self::Episodes => f.write_str("episodes"),
        }
    }
}

/// A fully fetched, point-in-time copy of one collection.
///
/// Only ever built from a pagination run that consumed every page, so a
/// published snapshot is never partial.
#[derive(Debug, Clone)]
pub struct BulkSnapshot {
    collection: TrackedCollection,
    records: Vec<Record>,
    fetched_at: DateTime<Utc>,
}

impl BulkSnapshot {
    pub fn new(collection: TrackedCollection, records: Vec<Record>) -> Self {
        Self {
            collection,
            records,
            fetched_at: Utc::now(),
        }
    }

    pub const fn collection(&self) -> TrackedCollection {
        self.collection
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.records.iter().filter_map(Record::as_character)
    }

    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.records.iter().filter_map(Record::as_episode)
    }
}
