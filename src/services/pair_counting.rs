//! Character co-occurrence report.
//!
//! Every unordered pair of distinct characters listed on the same episode is
//! counted once per episode. Counting is O(E·k²) for E episodes with at most
//! k characters each; k is a handful in practice, but this is the hot path if
//! episode casts ever grow large.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

use super::collection_cache::BulkCollectionCache;
use crate::domain::error::ServiceResult;
use crate::domain::models::{
    Bound, BulkSnapshot, Character, CharacterRef, Episode, PairKey, PairResult,
};

/// Count bounds and size limit of a pair report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairQuery {
    /// Smallest shared-episode count to report
    pub min: Bound,
    /// Largest shared-episode count to report
    pub max: Bound,
    /// Maximum number of pairs returned
    pub limit: Bound,
}

/// Builds the top co-occurring character pairs from the cached collections
pub struct PairCountingEngine {
    cache: Arc<BulkCollectionCache>,
}

impl PairCountingEngine {
    pub fn new(cache: Arc<BulkCollectionCache>) -> Self {
        Self { cache }
    }

    /// Pairs of characters ranked by the number of episodes they share.
    ///
    /// # Errors
    /// Fails only if either bulk collection cannot be obtained. Pairs that
    /// reference a character missing from the character snapshot are dropped.
    pub async fn top_pairs(&self, query: PairQuery) -> ServiceResult<Vec<PairResult>> {
        let (characters, episodes) = tokio::join!(self.cache.characters(), self.cache.episodes());
        let characters = characters?;
        let episodes = episodes?;

        Ok(rank_pairs(&characters, &episodes, query))
    }
}

/// Count, for every unordered character pair, how many episodes list both.
///
/// A locator repeated within one episode's cast is counted once.
pub fn count_pairs<'a>(episodes: impl IntoIterator<Item = &'a Episode>) -> HashMap<PairKey, usize> {
    let mut counts = HashMap::new();

    for episode in episodes {
        let cast: Vec<&str> = episode
            .characters
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for (i, first) in cast.iter().enumerate() {
            for second in &cast[i + 1..] {
                if let Some(key) = PairKey::new(first, second) {
                    *counts.entry(key).or_insert(0) += 1;
                }
            }
        }
    }

    counts
}

/// Filter, resolve, order and truncate the pair counts of `episodes`.
///
/// Ordering is by count descending, then by pair key ascending so equal
/// counts always come out the same way.
pub fn rank_pairs(
    characters: &BulkSnapshot,
    episodes: &BulkSnapshot,
    query: PairQuery,
) -> Vec<PairResult> {
    let by_url: HashMap<&str, &Character> = characters
        .characters()
        .map(|c| (c.url.as_str(), c))
        .collect();

    let counts = count_pairs(episodes.episodes());
    let counted = counts.len();

    let mut ranked: Vec<(PairKey, usize, &Character, &Character)> = Vec::new();
    let mut unresolved = 0usize;

    for (key, count) in counts {
        if !query.min.admits_min(count) || !query.max.admits_max(count) {
            continue;
        }
        match (by_url.get(key.first()), by_url.get(key.second())) {
            (Some(&first), Some(&second)) => ranked.push((key, count, first, second)),
            _ => unresolved += 1,
        }
    }

    if unresolved > 0 {
        debug!(unresolved, "dropped pairs referencing unknown characters");
    }

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    query.limit.truncate(&mut ranked);

    debug!(
        episodes = episodes.len(),
        counted,
        returned = ranked.len(),
        "pair report built"
    );

    ranked
        .into_iter()
        .map(|(_, count, first, second)| PairResult {
            character1: CharacterRef::from(first),
            character2: CharacterRef::from(second),
            episodes: count,
        })
        .collect()
}
