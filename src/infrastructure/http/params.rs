//! Query-string validation for the HTTP routes.

use std::collections::HashMap;
use thiserror::Error;

use crate::domain::models::Bound;
use crate::services::PairQuery;

/// Number of pairs returned when `limit` is absent
pub const DEFAULT_TOP_PAIRS_LIMIT: usize = 20;

/// Rejected query parameter; the message is returned to the client as is
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing required query parameter: {0}")]
    Missing(&'static str),

    #[error("{0} must be a non-negative integer")]
    NotANonNegativeInteger(&'static str),
}

/// Parameters of `GET /search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub term: String,
    pub limit: Bound,
}

impl SearchParams {
    pub fn parse(query: &HashMap<String, String>) -> Result<Self, ParamError> {
        // Forwarded upstream as given; only an absent or empty term is missing
        let term = query
            .get("term")
            .filter(|t| !t.is_empty())
            .ok_or(ParamError::Missing("term"))?
            .clone();

        Ok(Self {
            term,
            limit: optional_count(query, "limit")?.into(),
        })
    }
}

/// Parameters of `GET /top-pairs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopPairsParams {
    pub min: Bound,
    pub max: Bound,
    pub limit: Bound,
}

impl TopPairsParams {
    pub fn parse(query: &HashMap<String, String>) -> Result<Self, ParamError> {
        Ok(Self {
            min: optional_count(query, "min")?.into(),
            max: optional_count(query, "max")?.into(),
            limit: Bound::At(optional_count(query, "limit")?.unwrap_or(DEFAULT_TOP_PAIRS_LIMIT)),
        })
    }
}

impl From<TopPairsParams> for PairQuery {
    fn from(params: TopPairsParams) -> Self {
        Self {
            min: params.min,
            max: params.max,
            limit: params.limit,
        }
    }
}

/// An absent or empty parameter is `None`; anything else must parse as a
/// non-negative integer
fn optional_count(
    query: &HashMap<String, String>,
    name: &'static str,
) -> Result<Option<usize>, ParamError> {
    match query.get(name).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ParamError::NotANonNegativeInteger(name)),
    }
}
