//! Pull-through cache for the bulk character and episode collections.
//!
//! Each collection lives in its own slot with its own freshness timestamp.
//! A slot is refreshed by fetching every upstream page; the new snapshot and
//! its timestamp are published together under one write lock, and a failed
//! refresh leaves the previous snapshot in place.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::pagination::collect_all;
use crate::domain::error::FetchError;
use crate::domain::models::{BulkSnapshot, TrackedCollection};
use crate::domain::ports::PageFetcher;

/// Snapshot plus the instant it was published
struct CacheEntry {
    snapshot: Arc<BulkSnapshot>,
    refreshed_at: Instant,
}

/// One independently refreshed collection
#[derive(Default)]
struct CollectionSlot {
    entry: RwLock<Option<CacheEntry>>,
    /// Held for the whole check-fetch-store sequence of a refresh
    refresh_lock: Mutex<()>,
}

/// Point-in-time view of one cached collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStatus {
    pub collection: TrackedCollection,
    pub records: usize,
    pub fetched_at: DateTime<Utc>,
    pub fresh: bool,
}

/// Time-bounded cache holding full snapshots of characters and episodes
pub struct BulkCollectionCache {
    fetcher: Arc<dyn PageFetcher>,
    ttl: Duration,
    characters: CollectionSlot,
    episodes: CollectionSlot,
}

impl BulkCollectionCache {
    pub fn new(fetcher: Arc<dyn PageFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            characters: CollectionSlot::default(),
            episodes: CollectionSlot::default(),
        }
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    const fn slot(&self, collection: TrackedCollection) -> &CollectionSlot {
        match collection {
            TrackedCollection::Characters => &self.characters,
            TrackedCollection::Episodes => &self.episodes,
        }
    }

    /// Return the snapshot of `collection`, refreshing it first if it is
    /// missing or older than the TTL.
    ///
    /// At most one refresh per collection runs at a time. Callers that arrive
    /// while a refresh is in flight wait for it and then reuse its snapshot.
    /// Refreshes of different collections never wait on each other.
    ///
    /// # Errors
    /// Returns the upstream error unchanged if the refresh fails. The
    /// previously cached snapshot, if any, is kept.
    pub async fn get(&self, collection: TrackedCollection) -> Result<Arc<BulkSnapshot>, FetchError> {
        let slot = self.slot(collection);

        if let Some(snapshot) = self.fresh_snapshot(slot).await {
            debug!(%collection, "bulk cache hit");
            return Ok(snapshot);
        }

        let _refresh = slot.refresh_lock.lock().await;

        // Whoever held the lock before us may already have refreshed
        if let Some(snapshot) = self.fresh_snapshot(slot).await {
            debug!(%collection, "bulk cache refreshed by concurrent caller");
            return Ok(snapshot);
        }

        info!(%collection, "bulk cache miss, refreshing from upstream");
        let started = Instant::now();

        let records = match collect_all(self.fetcher.as_ref(), collection.kind(), None).await {
            Ok(records) => records,
            Err(err) => {
                warn!(%collection, error = %err, "bulk refresh failed, keeping previous snapshot");
                return Err(err);
            }
        };

        let snapshot = Arc::new(BulkSnapshot::new(collection, records));
        *slot.entry.write().await = Some(CacheEntry {
            snapshot: Arc::clone(&snapshot),
            refreshed_at: Instant::now(),
        });

        info!(
            %collection,
            records = snapshot.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "bulk collection refreshed"
        );

        Ok(snapshot)
    }

    pub async fn characters(&self) -> Result<Arc<BulkSnapshot>, FetchError> {
        self.get(TrackedCollection::Characters).await
    }

    pub async fn episodes(&self) -> Result<Arc<BulkSnapshot>, FetchError> {
        self.get(TrackedCollection::Episodes).await
    }

    /// Currently stored snapshot regardless of age, without contacting upstream
    pub async fn cached(&self, collection: TrackedCollection) -> Option<Arc<BulkSnapshot>> {
        self.slot(collection)
            .entry
            .read()
            .await
            .as_ref()
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Populate both collections concurrently.
    ///
    /// Returns the failures; an empty vector means both collections are ready.
    pub async fn warm(&self) -> Vec<(TrackedCollection, FetchError)> {
        let (characters, episodes) = tokio::join!(self.characters(), self.episodes());

        [
            (TrackedCollection::Characters, characters),
            (TrackedCollection::Episodes, episodes),
        ]
        .into_iter()
        .filter_map(|(collection, result)| result.err().map(|err| (collection, err)))
        .collect()
    }

    /// Status of every populated collection
    pub async fn status(&self) -> Vec<CollectionStatus> {
        let mut statuses = Vec::with_capacity(TrackedCollection::ALL.len());
        for collection in TrackedCollection::ALL {
            let guard = self.slot(collection).entry.read().await;
            if let Some(entry) = guard.as_ref() {
                statuses.push(CollectionStatus {
                    collection,
                    records: entry.snapshot.len(),
                    fetched_at: entry.snapshot.fetched_at(),
                    fresh: entry.refreshed_at.elapsed() < self.ttl,
                });
            }
        }
        statuses
    }

    async fn fresh_snapshot(&self, slot: &CollectionSlot) -> Option<Arc<BulkSnapshot>> {
        slot.entry
            .read()
            .await
            .as_ref()
            .filter(|entry| entry.refreshed_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Character, Episode, ResourceKind};
    use crate::infrastructure::rickmorty::InMemoryPageFetcher;

    const TTL: Duration = Duration::from_secs(60);

    fn character(id: u64) -> Character {
        Character {
            id,
            name: format!("Character {id}"),
            url: format!("https://example.test/api/character/{id}"),
            episodes: vec![],
        }
    }

    fn episode(id: u64) -> Episode {
        Episode {
            id,
            name: format!("Episode {id}"),
            url: format!("https://example.test/api/episode/{id}"),
            code: format!("S01E{id:02}"),
            characters: vec![],
        }
    }

    fn fetcher() -> Arc<InMemoryPageFetcher> {
        Arc::new(
            InMemoryPageFetcher::new(2)
                .with_records((1..=5).map(character))
                .with_records((1..=3).map(episode)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_within_ttl_do_not_refetch() {
        let fetcher = fetcher();
        let cache = BulkCollectionCache::new(fetcher.clone(), TTL);

        let first = cache.characters().await.unwrap();
        assert_eq!(first.len(), 5);
        let calls_after_refresh = fetcher.calls(ResourceKind::Character);
        assert_eq!(calls_after_refresh, 3);

        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(5)).await;
            let again = cache.characters().await.unwrap();
            assert!(Arc::ptr_eq(&first, &again));
        }

        assert_eq!(fetcher.calls(ResourceKind::Character), calls_after_refresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refreshed() {
        let fetcher = fetcher();
        let cache = BulkCollectionCache::new(fetcher.clone(), TTL);

        let first = cache.characters().await.unwrap();
        fetcher.set_records(ResourceKind::Character, (1..=7).map(character));

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let second = cache.characters().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 7);
        assert_eq!(fetcher.calls(ResourceKind::Character), 3 + 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_refresh() {
        let fetcher = Arc::new(
            InMemoryPageFetcher::new(2)
                .with_records((1..=5).map(character))
                .with_delay(Duration::from_millis(50)),
        );
        let cache = Arc::new(BulkCollectionCache::new(fetcher.clone(), TTL));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.characters().await })
            })
            .collect();

        let mut snapshots = Vec::new();
        for handle in handles {
            snapshots.push(handle.await.unwrap().unwrap());
        }

        // One refresh of three pages, shared by every caller
        assert_eq!(fetcher.calls(ResourceKind::Character), 3);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_refresh_after_expiry() {
        let fetcher = Arc::new(
            InMemoryPageFetcher::new(2)
                .with_records((1..=5).map(character))
                .with_delay(Duration::from_millis(50)),
        );
        let cache = Arc::new(BulkCollectionCache::new(fetcher.clone(), TTL));

        let stale = cache.characters().await.unwrap();
        assert_eq!(stale.collection(), TrackedCollection::Characters);
        assert_eq!(fetcher.total_calls(), 3);

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.characters().await })
            })
            .collect();

        let mut snapshots = Vec::new();
        for handle in handles {
            snapshots.push(handle.await.unwrap().unwrap());
        }

        // Exactly one more three-page refresh, and nothing for episodes
        assert_eq!(fetcher.calls(ResourceKind::Character), 6);
        assert_eq!(fetcher.total_calls(), 6);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
        assert!(!Arc::ptr_eq(&stale, &snapshots[0]));
        assert!(!snapshots[0].is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_collections_have_independent_freshness() {
        let fetcher = fetcher();
        let cache = BulkCollectionCache::new(fetcher.clone(), TTL);

        let characters = cache.characters().await.unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;

        // Refreshing episodes late must not extend the characters' lifetime
        let episodes = cache.episodes().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        let characters_again = cache.characters().await.unwrap();
        assert!(!Arc::ptr_eq(&characters, &characters_again));
        assert_eq!(fetcher.calls(ResourceKind::Character), 6);

        let episodes_again = cache.episodes().await.unwrap();
        assert!(Arc::ptr_eq(&episodes, &episodes_again));
        assert_eq!(fetcher.calls(ResourceKind::Episode), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let fetcher = fetcher();
        let cache = BulkCollectionCache::new(fetcher.clone(), TTL);

        let previous = cache.characters().await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        fetcher.set_records(ResourceKind::Character, (1..=9).map(character));
        fetcher.fail_next(ResourceKind::Character, 1);

        let result = cache.characters().await;
        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));

        let kept = cache.cached(TrackedCollection::Characters).await.unwrap();
        assert!(Arc::ptr_eq(&previous, &kept));

        // Episodes are untouched by the characters failure
        assert!(cache.cached(TrackedCollection::Episodes).await.is_none());

        let recovered = cache.characters().await.unwrap();
        assert_eq!(recovered.len(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_on_later_page_publishes_nothing() {
        let fetcher = fetcher();
        let cache = BulkCollectionCache::new(fetcher.clone(), TTL);

        // Page one succeeds, page two fails
        fetcher.fail_after(ResourceKind::Character, 1, 1);

        let result = cache.characters().await;
        assert!(result.is_err());
        assert_eq!(fetcher.calls(ResourceKind::Character), 2);
        assert!(cache.cached(TrackedCollection::Characters).await.is_none());
        assert!(cache.status().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_warm_reports_failures_per_collection() {
        let fetcher = fetcher();
        fetcher.fail_next(ResourceKind::Episode, 1);
        let cache = BulkCollectionCache::new(fetcher.clone(), TTL);

        let failures = cache.warm().await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, TrackedCollection::Episodes);

        let status = cache.status().await;
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].collection, TrackedCollection::Characters);
        assert_eq!(status[0].records, 5);
        assert!(status[0].fresh);
    }
}
