//! In-memory page fetcher for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::error::FetchError;
use crate::domain::models::{Page, Record, ResourceKind};
use crate::domain::ports::PageFetcher;

/// Serves fixed records with upstream-like pagination and name filtering.
///
/// Counts calls per kind and can be told to fail or to answer slowly, which
/// is what the cache and fan-out tests need to observe.
pub struct InMemoryPageFetcher {
    page_size: usize,
    delay: Duration,
    records: Mutex<HashMap<ResourceKind, Vec<Record>>>,
    calls: Mutex<HashMap<ResourceKind, usize>>,
    failures: Mutex<HashMap<ResourceKind, FailurePlan>>,
}

/// Requests to let through, then requests to fail
#[derive(Debug, Clone, Copy, Default)]
struct FailurePlan {
    skip: usize,
    count: usize,
}

impl InMemoryPageFetcher {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            delay: Duration::ZERO,
            records: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_record(self, record: impl Into<Record>) -> Self {
        let record = record.into();
        lock(&self.records)
            .entry(record.kind())
            .or_default()
            .push(record);
        self
    }

    #[must_use]
    pub fn with_records<R: Into<Record>>(self, records: impl IntoIterator<Item = R>) -> Self {
        records
            .into_iter()
            .fold(self, |fetcher, record| fetcher.with_record(record))
    }

    /// Sleep this long before answering each page
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace every record of `kind`
    pub fn set_records<R: Into<Record>>(&self, kind: ResourceKind, records: impl IntoIterator<Item = R>) {
        let records = records.into_iter().map(Into::into).collect();
        lock(&self.records).insert(kind, records);
    }

    /// Make the next `count` requests for `kind` fail with a 500
    pub fn fail_next(&self, kind: ResourceKind, count: usize) {
        self.fail_after(kind, 0, count);
    }

    /// Let `skip` requests for `kind` through, then fail the following `count`
    pub fn fail_after(&self, kind: ResourceKind, skip: usize, count: usize) {
        lock(&self.failures).insert(kind, FailurePlan { skip, count });
    }

    /// Number of page requests made for `kind`
    pub fn calls(&self, kind: ResourceKind) -> usize {
        lock(&self.calls).get(&kind).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    fn take_failure(&self, kind: ResourceKind) -> bool {
        let mut failures = lock(&self.failures);
        let Some(plan) = failures.get_mut(&kind) else {
            return false;
        };
        if plan.skip > 0 {
            plan.skip -= 1;
            false
        } else if plan.count > 0 {
            plan.count -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl PageFetcher for InMemoryPageFetcher {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        name: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<Page, FetchError> {
        *lock(&self.calls).entry(kind).or_default() += 1;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let url = format!("memory://{kind}?page={}", cursor.unwrap_or("1"));
        if self.take_failure(kind) {
            return Err(FetchError::Status {
                url,
                status: 500,
                body: "injected failure".to_string(),
            });
        }

        let page_number: usize = match cursor {
            None => 1,
            Some(c) => c
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or_else(|| FetchError::Decode {
                    url: url.clone(),
                    message: format!("unknown cursor {c}"),
                })?,
        };

        let needle = name.map(str::to_lowercase);
        let matching: Vec<Record> = lock(&self.records)
            .get(&kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        needle
                            .as_deref()
                            .is_none_or(|n| r.name().to_lowercase().contains(n))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if matching.is_empty() {
            return Ok(Page::empty());
        }

        let start = (page_number - 1) * self.page_size;
        let records: Vec<Record> = matching
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = (start + self.page_size < matching.len()).then(|| (page_number + 1).to_string());

        Ok(Page::new(records, next))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
