//! Subcommand implementations

pub mod search;
pub mod serve;
pub mod top_pairs;

use anyhow::Result;
use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::PageFetcher;
use crate::infrastructure::rickmorty::RickMortyClient;
use crate::services::{BulkCollectionCache, FanoutSearchAggregator, PairCountingEngine};

/// Services wired to one upstream client and one cache
pub struct ServiceContext {
    pub cache: Arc<BulkCollectionCache>,
    pub search: FanoutSearchAggregator,
    pub pairs: PairCountingEngine,
}

impl ServiceContext {
    /// Build the live client from `config` and wire the services to it
    pub fn from_config(config: &Config) -> Result<Self> {
        let client: Arc<dyn PageFetcher> = Arc::new(RickMortyClient::new(&config.upstream)?);
        Ok(Self::with_fetcher(client, config))
    }

    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Self {
        let cache = Arc::new(BulkCollectionCache::new(
            Arc::clone(&fetcher),
            config.cache.ttl(),
        ));
        Self {
            search: FanoutSearchAggregator::new(fetcher),
            pairs: PairCountingEngine::new(Arc::clone(&cache)),
            cache,
        }
    }
}
