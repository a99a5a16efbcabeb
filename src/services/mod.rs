//! Application services
//!
//! Each service depends only on the [`PageFetcher`](crate::domain::ports::PageFetcher)
//! port, so they run the same against the live API and the in-memory fetcher.

pub mod collection_cache;
pub mod pagination;
pub mod pair_counting;
pub mod search_aggregator;

pub use collection_cache::{BulkCollectionCache, CollectionStatus};
pub use pagination::collect_all;
pub use pair_counting::{count_pairs, rank_pairs, PairCountingEngine, PairQuery};
pub use search_aggregator::FanoutSearchAggregator;
