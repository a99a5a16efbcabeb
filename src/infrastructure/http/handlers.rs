//! Route handlers and the error-to-status mapping.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use super::params::{ParamError, SearchParams, TopPairsParams};
use crate::domain::error::ServiceError;
use crate::domain::models::{PairResult, SearchResult};
use crate::services::{
    BulkCollectionCache, CollectionStatus, FanoutSearchAggregator, PairCountingEngine,
};

/// Body of every 500 response; upstream details stay in the logs
pub const UPSTREAM_FAILURE_MESSAGE: &str = "error fetching data from Rick and Morty API";

/// Shared state of the HTTP server
pub struct AppState {
    pub search: FanoutSearchAggregator,
    pub pairs: PairCountingEngine,
    pub cache: Arc<BulkCollectionCache>,
}

impl AppState {
    /// Wire both services to one cache
    pub fn new(search: FanoutSearchAggregator, cache: Arc<BulkCollectionCache>) -> Self {
        Self {
            search,
            pairs: PairCountingEngine::new(Arc::clone(&cache)),
            cache,
        }
    }
}

/// Failure of a request, rendered as a plain-text body
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    InvalidParam(#[from] ParamError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidParam(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            Self::Service(err) => {
                error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE).into_response()
            }
        }
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let params = SearchParams::parse(&query)?;
    let results = state.search.search(&params.term, params.limit).await?;
    Ok(Json(results))
}

pub async fn top_pairs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<PairResult>>, ApiError> {
    let params = TopPairsParams::parse(&query)?;
    let pairs = state.pairs.top_pairs(params.into()).await?;
    Ok(Json(pairs))
}

/// Age and size of the cached bulk collections; never contacts upstream
pub async fn cache_status(State(state): State<Arc<AppState>>) -> Json<Vec<CollectionStatus>> {
    Json(state.cache.status().await)
}
