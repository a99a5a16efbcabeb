use thiserror::Error;

/// Failure talking to the upstream API.
///
/// A `404` for a whole query is not represented here: the fetcher reports it
/// as an empty page so "no matches" never looks like a failed fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS or protocol failure
    #[error("GET {url}: {message}")]
    Transport { url: String, message: String },

    /// No response within the client timeout
    #[error("GET {url}: timed out")]
    Timeout { url: String },

    /// Any non-success status other than 404
    #[error("GET {url}: unexpected status {status}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the page shape
    #[error("decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Request URL could not be built
    #[error("invalid request url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// Returns true if this error is transient and the request may be retried
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } | Self::InvalidUrl { .. } => false,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::InvalidUrl { url, .. } => url,
        }
    }
}

/// Errors surfaced by the aggregation services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] FetchError),

    /// A spawned lookup panicked or was aborted before reporting
    #[error("lookup worker failed: {0}")]
    WorkerFailed(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::WorkerFailed(err.to_string())
    }
}

/// Convenience alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;
