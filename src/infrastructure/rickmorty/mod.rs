//! Rick and Morty API adapter
//!
//! [`RickMortyClient`] talks to the live REST API with rate limiting and
//! retry. [`InMemoryPageFetcher`] serves fixed records for tests and demos.

pub mod client;
pub mod mock_fetcher;
pub mod rate_limiter;
pub mod retry;

pub use client::RickMortyClient;
pub use mock_fetcher::InMemoryPageFetcher;
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
