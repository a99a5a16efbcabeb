//! Cross-resource name search.
//!
//! One lookup per resource kind runs as its own task. The results are joined
//! by slot position, so output order never depends on which lookup finishes
//! first.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use super::pagination::collect_all;
use crate::domain::error::{FetchError, ServiceResult};
use crate::domain::models::{Bound, Record, ResourceKind, SearchResult};
use crate::domain::ports::PageFetcher;

/// Slot order of the merged result
const SEARCH_ORDER: [ResourceKind; 3] = [
    ResourceKind::Character,
    ResourceKind::Location,
    ResourceKind::Episode,
];

/// Fans a name search out to every resource kind and merges the answers
pub struct FanoutSearchAggregator {
    fetcher: Arc<dyn PageFetcher>,
}

impl FanoutSearchAggregator {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Search characters, locations and episodes whose name matches `term`.
    ///
    /// Results are concatenated characters first, then locations, then
    /// episodes, each in upstream page order, and the concatenation is cut to
    /// `limit`. Zero matches yield an empty vector.
    ///
    /// # Errors
    /// Fails if any single lookup fails. Every lookup is awaited before the
    /// outcome is decided, and no partial result is returned.
    pub async fn search(&self, term: &str, limit: Bound) -> ServiceResult<Vec<SearchResult>> {
        let handles: Vec<_> = SEARCH_ORDER
            .iter()
            .map(|&kind| {
                let fetcher = Arc::clone(&self.fetcher);
                let term = term.to_string();
                tokio::spawn(async move { lookup(fetcher.as_ref(), kind, &term).await })
            })
            .collect();

        let outcomes = join_all(handles).await;

        let mut results = Vec::new();
        for (kind, outcome) in SEARCH_ORDER.iter().zip(outcomes) {
            match outcome {
                Ok(Ok(found)) => results.extend(found),
                Ok(Err(err)) => {
                    warn!(%kind, term, error = %err, "search lookup failed");
                    return Err(err.into());
                }
                Err(err) => {
                    warn!(%kind, term, error = %err, "search lookup worker failed");
                    return Err(err.into());
                }
            }
        }

        let matched = results.len();
        limit.truncate(&mut results);
        debug!(term, matched, returned = results.len(), "search complete");

        Ok(results)
    }
}

/// Page through every record of `kind` matching `term`
async fn lookup(
    fetcher: &dyn PageFetcher,
    kind: ResourceKind,
    term: &str,
) -> Result<Vec<SearchResult>, FetchError> {
    let records = collect_all(fetcher, kind, Some(term)).await?;
    Ok(records.iter().map(to_search_result).collect())
}

fn to_search_result(record: &Record) -> SearchResult {
    SearchResult {
        name: record.name().to_string(),
        kind: record.kind(),
        url: record.url().to_string(),
    }
}
