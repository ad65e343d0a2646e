//! Paginated collection fetching.
//!
//! The *arr history endpoints are paged server-side. [`fetch_all`] walks those
//! pages through a [`PageSource`] and concatenates them until the caller's
//! quota is met, the server's collection is drained, or the server hands back
//! an empty page.
//!
//! The loop is strictly sequential: the next request depends on the total
//! reported by the previous page. Any error, including cancellation, aborts
//! the whole fetch and the records gathered so far are dropped.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Request, StarrClient};
use crate::error::{Result, StarrError};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Sort order accepted by paged endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// One page-scoped request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub sort_key: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            sort_key: None,
            sort_direction: None,
        }
    }

    #[must_use]
    pub fn sorted_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = Some(direction);
        self
    }

    /// Query parameters understood by the *arr paged endpoints.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(ref key) = self.sort_key {
            params.push(("sortKey".to_string(), key.clone()));
        }
        if let Some(direction) = self.sort_direction {
            params.push(("sortDirection".to_string(), direction.as_str().to_string()));
        }
        params
    }
}

/// A page of records as returned by the server, and the shape of an
/// accumulated result.
///
/// When produced by [`fetch_all`], `page_size` carries the final total record
/// count, matching what the servers' own clients report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "R: Deserialize<'de>"))]
pub struct Page<R> {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
    #[serde(default)]
    pub sort_key: String,
    #[serde(default)]
    pub sort_direction: String,
    #[serde(default)]
    pub total_records: usize,
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub records: Vec<R>,
}

/// Servers send `"records": null` for some empty pages.
fn null_as_empty<'de, D, R>(deserializer: D) -> std::result::Result<Vec<R>, D::Error>
where
    D: Deserializer<'de>,
    R: Deserialize<'de>,
{
    Ok(Option::<Vec<R>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<R> Default for Page<R> {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 0,
            sort_key: String::new(),
            sort_direction: String::new(),
            total_records: 0,
            records: Vec::new(),
        }
    }
}

/// Anything that can fetch one page of `R`.
#[async_trait]
pub trait PageSource<R>: Send + Sync {
    async fn fetch_page(&self, cancel: &CancellationToken, request: PageRequest)
    -> Result<Page<R>>;
}

/// A paged endpoint on a [`StarrClient`], e.g. `v1/history`.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    client: &'a StarrClient,
    uri: String,
}

impl<'a> Endpoint<'a> {
    pub fn new(client: &'a StarrClient, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into(),
        }
    }
}

#[async_trait]
impl<'a, R> PageSource<R> for Endpoint<'a>
where
    R: serde::de::DeserializeOwned + Send + 'static,
{
    async fn fetch_page(
        &self,
        cancel: &CancellationToken,
        request: PageRequest,
    ) -> Result<Page<R>> {
        let mut req = Request::new(self.uri.clone());
        req.query = request.params();
        self.client.get_into_with(cancel, &req).await
    }
}

/// Starting page size for a fetch of `desired` records.
///
/// A zero hint selects [`DEFAULT_PAGE_SIZE`]; a quota smaller than the page
/// size shrinks the first page to the quota.
#[must_use]
pub fn starting_page_size(desired: usize, hint: usize) -> usize {
    let page_size = if hint == 0 { DEFAULT_PAGE_SIZE } else { hint };
    if desired > 0 && desired < page_size {
        desired
    } else {
        page_size
    }
}

/// Page size for `next_page` after `accumulated` records have arrived.
///
/// The size only ever shrinks, and only when the smaller page still starts at
/// record `accumulated`: a 1-based page number addresses offset
/// `(page - 1) * size`, so any other shrink would re-read or skip records.
#[must_use]
pub fn adjust_page_size(
    desired: usize,
    total: usize,
    accumulated: usize,
    current: usize,
    next_page: usize,
) -> usize {
    let target = if desired == 0 { total } else { desired };
    let remaining = target.saturating_sub(accumulated);
    if remaining == 0 {
        return current;
    }

    let candidate = remaining.min(current);
    if candidate < current && next_page.saturating_sub(1) * candidate == accumulated {
        candidate
    } else {
        current
    }
}

/// Fetch `desired` records (all of them when zero) from `source`.
///
/// Stops as soon as the accumulated count reaches the server's reported total,
/// reaches `desired`, or a page comes back empty. The result is not truncated
/// to `desired`: the last page is kept whole.
pub async fn fetch_all<R, S>(
    source: &S,
    cancel: &CancellationToken,
    desired: usize,
    page_size_hint: usize,
) -> Result<Page<R>>
where
    S: PageSource<R> + ?Sized,
{
    let mut acc: Page<R> = Page::default();
    let mut page_size = starting_page_size(desired, page_size_hint);

    for page in 1.. {
        if cancel.is_cancelled() {
            return Err(StarrError::Cancelled);
        }

        let current = source
            .fetch_page(cancel, PageRequest::new(page, page_size))
            .await?;
        let fetched = current.records.len();
        acc.records.extend(current.records);

        tracing::debug!(
            page,
            page_size,
            fetched,
            total_so_far = acc.records.len(),
            total_records = current.total_records,
            "Fetched page"
        );

        let drained = acc.records.len() >= current.total_records;
        let quota_met = desired != 0 && acc.records.len() >= desired;
        if drained || quota_met || fetched == 0 {
            acc.page = page;
            acc.page_size = current.total_records;
            acc.total_records = current.total_records;
            acc.sort_key = current.sort_key;
            acc.sort_direction = current.sort_direction;
            break;
        }

        page_size = adjust_page_size(
            desired,
            current.total_records,
            acc.records.len(),
            page_size,
            page + 1,
        );
    }

    Ok(acc)
}
