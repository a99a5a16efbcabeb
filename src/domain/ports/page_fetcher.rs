use async_trait::async_trait;

use crate::domain::error::FetchError;
use crate::domain::models::{Page, ResourceKind};

/// Paginated access to one upstream resource collection.
///
/// Implementations own timeouts, retries and rate limiting for individual
/// requests; callers only drive pagination.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of `kind`.
    ///
    /// # Arguments
    /// * `kind` - Collection to read
    /// * `name` - Optional server-side name filter
    /// * `cursor` - Continuation returned by the previous page, `None` for the first page
    ///
    /// # Returns
    /// * `Ok(page)` - Records plus the cursor of the following page, if any
    /// * `Ok(Page::empty())` - The upstream knows nothing matching the query
    /// * `Err(FetchError)` - Transport failure or unexpected status
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<Page, FetchError>;
}
