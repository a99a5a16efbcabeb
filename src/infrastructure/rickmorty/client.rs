use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use crate::domain::error::FetchError;
use crate::domain::models::{Character, Episode, Location, Page, Record, ResourceKind, UpstreamConfig};
use crate::domain::ports::PageFetcher;

/// Envelope of every list endpoint
#[derive(Debug, Deserialize)]
struct ApiPage<T> {
    info: PageInfo,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(default)]
    next: Option<String>,
}

/// HTTP client for the Rick and Morty REST API
///
/// Continuation cursors are the absolute `info.next` URLs returned by the
/// API and are requested verbatim.
pub struct RickMortyClient {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// Base URL without trailing slash
    base_url: String,

    rate_limiter: TokenBucketRateLimiter,

    retry_policy: RetryPolicy,
}

impl RickMortyClient {
    /// Build a client from the upstream section of the configuration
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: TokenBucketRateLimiter::new(config.requests_per_second),
            retry_policy: RetryPolicy::from(config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the first page of `kind`, optionally filtered by name
    fn first_page_url(&self, kind: ResourceKind, name: Option<&str>) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", self.base_url, kind.as_str());
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        if let Some(name) = name {
            url.query_pairs_mut().append_pair("name", name);
        }
        Ok(url)
    }

    fn request_url(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<Url, FetchError> {
        match cursor {
            Some(next) => Url::parse(next).map_err(|e| FetchError::InvalidUrl {
                url: next.to_string(),
                message: e.to_string(),
            }),
            None => self.first_page_url(kind, name),
        }
    }

    /// Wait for a rate-limit token, then issue one GET
    async fn throttled_get(&self, kind: ResourceKind, url: &Url) -> Result<Page, FetchError> {
        self.rate_limiter.acquire().await;
        self.get_page(kind, url).await
    }

    /// One GET without retry
    async fn get_page(&self, kind: ResourceKind, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();

        // The API answers a name filter with no matches with 404
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "no records for query");
            return Ok(Page::empty());
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(url, e))?;

        decode_page(kind, url.as_str(), &body)
    }
}

#[async_trait]
impl PageFetcher for RickMortyClient {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<Page, FetchError> {
        let url = self.request_url(kind, name, cursor)?;

        self.retry_policy
            .execute(|| self.throttled_get(kind, &url))
            .await
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Decode a list response body into a page of `kind` records
fn decode_page(kind: ResourceKind, url: &str, body: &str) -> Result<Page, FetchError> {
    match kind {
        ResourceKind::Character => decode_as::<Character>(url, body),
        ResourceKind::Location => decode_as::<Location>(url, body),
        ResourceKind::Episode => decode_as::<Episode>(url, body),
    }
}

fn decode_as<T>(url: &str, body: &str) -> Result<Page, FetchError>
where
    T: DeserializeOwned + Into<Record>,
{
    let page: ApiPage<T> = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(Page::new(
        page.results.into_iter().map(Into::into).collect(),
        page.info.next.filter(|next| !next.is_empty()),
    ))
}
