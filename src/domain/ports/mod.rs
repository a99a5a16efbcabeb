//! Port trait definitions (Hexagonal Architecture)
//!
//! - PageFetcher: paginated reads from the upstream API
//!
//! Services depend only on these traits, so the upstream can be swapped for
//! an in-process fake in tests.

pub mod page_fetcher;

pub use page_fetcher::PageFetcher;
