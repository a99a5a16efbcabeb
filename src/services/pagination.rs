//! Drives a [`PageFetcher`] across every page of one query.

use tracing::debug;

use crate::domain::error::FetchError;
use crate::domain::models::{Record, ResourceKind};
use crate::domain::ports::PageFetcher;

/// Fetch every record of `kind`, optionally filtered by `name`.
///
/// Starts from the first page and follows continuation cursors until one is
/// absent or a page comes back without records. Any fetch error aborts the
/// whole run so callers never see a partial collection.
pub async fn collect_all(
    fetcher: &dyn PageFetcher,
    kind: ResourceKind,
    name: Option<&str>,
) -> Result<Vec<Record>, FetchError> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetcher.fetch_page(kind, name, cursor.as_deref()).await?;
        pages += 1;

        if page.records.is_empty() {
            break;
        }
        records.extend(page.records);

        match page.next {
            // A cursor pointing back at the page just read would never end
            Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                cursor = Some(next);
            }
            _ => break,
        }
    }

    debug!(
        kind = %kind,
        name = name.unwrap_or_default(),
        pages,
        records = records.len(),
        "pagination complete"
    );

    Ok(records)
}
