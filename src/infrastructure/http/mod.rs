//! HTTP transport
//!
//! Routes:
//! - `GET /search?term=&limit=` cross-resource name search
//! - `GET /top-pairs?min=&max=&limit=` character co-occurrence report
//! - `GET /cache` bulk cache status
//! - `GET /health` liveness

pub mod handlers;
pub mod params;
pub mod server;

pub use handlers::{ApiError, AppState, UPSTREAM_FAILURE_MESSAGE};
pub use params::{ParamError, SearchParams, TopPairsParams, DEFAULT_TOP_PAIRS_LIMIT};
pub use server::{router, serve_with_shutdown};
