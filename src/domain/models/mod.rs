pub mod config;
pub mod query;
pub mod record;
pub mod snapshot;

pub use config::{CacheConfig, Config, LoggingConfig, ServerConfig, UpstreamConfig};
pub use query::{Bound, CharacterRef, PairKey, PairResult, SearchResult};
pub use record::{Character, Episode, Location, Page, Record, ResourceKind};
pub use snapshot::{BulkSnapshot, TrackedCollection};
