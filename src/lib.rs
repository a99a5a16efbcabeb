//! rickmorty-api - aggregation service over the Rick and Morty API
//!
//! Serves two reports built on top of the public REST API:
//! - a cross-resource name search that fans out to characters, locations and
//!   episodes concurrently and merges the answers in a fixed order
//! - a character co-occurrence report counting how many episodes each pair
//!   of characters shares, computed from time-bounded bulk snapshots
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): records, report shapes, errors and the
//!   [`PageFetcher`] port
//! - **Service Layer** (`services`): pagination, bulk cache, search fan-out
//!   and pair counting
//! - **Infrastructure Layer** (`infrastructure`): API client, HTTP server,
//!   configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::error::{FetchError, ServiceError, ServiceResult};
pub use domain::models::{
    Bound, BulkSnapshot, Character, Config, Episode, Location, Page, PairResult, Record,
    ResourceKind, SearchResult, TrackedCollection,
};
pub use domain::ports::PageFetcher;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::rickmorty::{InMemoryPageFetcher, RickMortyClient};
pub use services::{BulkCollectionCache, FanoutSearchAggregator, PairCountingEngine, PairQuery};
