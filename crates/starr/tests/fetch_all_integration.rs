//! Integration tests for paged collection fetching.
//!
//! These drive `fetch_all` through the public `PageSource` trait against
//! in-memory servers and check that every fetch terminates, returns records in
//! server order without duplicates, and never grows the page size.
//!
//! Key scenarios tested:
//! - Draining a collection across several pages
//! - Stopping once the caller's quota is met
//! - Empty collections and servers that run dry early
//! - Errors and cancellation abort without partial data

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use starr::{Page, PageRequest, PageSource, StarrError, fetch_all};
use tokio_util::sync::CancellationToken;

/// Maximum time any fetch should take. If exceeded, the loop failed to stop.
const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// A stable collection of `total` records numbered from 1.
struct CollectionServer {
    records: Vec<u64>,
    /// Reported total; defaults to the real length.
    reported_total: usize,
    fail_on_page: Option<usize>,
    cancel_after_page: Option<(usize, CancellationToken)>,
    requests: Mutex<Vec<PageRequest>>,
}

impl CollectionServer {
    fn new(total: u64) -> Self {
        Self {
            records: (1..=total).collect(),
            reported_total: total as usize,
            fail_on_page: None,
            cancel_after_page: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn fetched(&self) -> Vec<(usize, usize)> {
        self.requests()
            .iter()
            .map(|r| (r.page, r.page_size))
            .collect()
    }
}

#[async_trait]
impl PageSource<u64> for CollectionServer {
    async fn fetch_page(
        &self,
        _cancel: &CancellationToken,
        request: PageRequest,
    ) -> starr::Result<Page<u64>> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fail_on_page == Some(request.page) {
            return Err(StarrError::InvalidStatusCode {
                status: 500,
                message: "internal error".to_string(),
            });
        }

        if let Some((page, token)) = &self.cancel_after_page
            && *page == request.page
        {
            token.cancel();
        }

        let start = ((request.page - 1) * request.page_size).min(self.records.len());
        let end = (start + request.page_size).min(self.records.len());
        Ok(Page {
            page: request.page,
            page_size: request.page_size,
            sort_key: "date".to_string(),
            sort_direction: "descending".to_string(),
            total_records: self.reported_total,
            records: self.records[start..end].to_vec(),
        })
    }
}

async fn fetch(
    server: &CollectionServer,
    cancel: &CancellationToken,
    desired: usize,
    page_size: usize,
) -> starr::Result<Page<u64>> {
    tokio::time::timeout(FETCH_TIMEOUT, fetch_all(server, cancel, desired, page_size))
        .await
        .expect("fetch_all did not terminate")
}

#[tokio::test]
async fn test_drains_collection_in_three_pages() {
    let server = CollectionServer::new(250);
    let cancel = CancellationToken::new();

    let result = fetch(&server, &cancel, 0, 100).await.unwrap();

    assert_eq!(server.fetched(), vec![(1, 100), (2, 100), (3, 100)]);
    assert_eq!(result.records.len(), 250);
    assert_eq!(result.records, (1..=250).collect::<Vec<_>>());
    assert_eq!(result.total_records, 250);
}

#[tokio::test]
async fn test_stops_after_quota_is_met() {
    let server = CollectionServer::new(250);
    let cancel = CancellationToken::new();

    let result = fetch(&server, &cancel, 120, 100).await.unwrap();

    assert_eq!(server.fetched(), vec![(1, 100), (2, 100)]);
    assert_eq!(result.records.len(), 200);
    assert_eq!(result.records, (1..=200).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_empty_collection_needs_one_fetch() {
    let server = CollectionServer::new(0);
    let cancel = CancellationToken::new();

    let result = fetch(&server, &cancel, 0, 100).await.unwrap();

    assert_eq!(server.requests().len(), 1);
    assert!(result.records.is_empty());
    assert_eq!(result.total_records, 0);
}

#[tokio::test]
async fn test_second_page_error_is_returned_unchanged() {
    let mut server = CollectionServer::new(250);
    server.fail_on_page = Some(2);
    let cancel = CancellationToken::new();

    let err = fetch(&server, &cancel, 0, 100).await.unwrap_err();

    match err {
        StarrError::InvalidStatusCode { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_overstated_total_stops_on_empty_page() {
    let mut server = CollectionServer::new(150);
    server.reported_total = 1_000;
    let cancel = CancellationToken::new();

    let result = fetch(&server, &cancel, 0, 100).await.unwrap();

    assert_eq!(server.fetched(), vec![(1, 100), (2, 100), (3, 100)]);
    assert_eq!(result.records.len(), 150);
    assert_eq!(result.total_records, 1_000);
}

#[tokio::test]
async fn test_cancellation_between_pages_discards_records() {
    let cancel = CancellationToken::new();
    let mut server = CollectionServer::new(250);
    server.cancel_after_page = Some((1, cancel.clone()));

    let err = fetch(&server, &cancel, 0, 100).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_default_page_size_when_hint_is_zero() {
    let server = CollectionServer::new(1_200);
    let cancel = CancellationToken::new();

    let result = fetch(&server, &cancel, 0, 0).await.unwrap();

    assert_eq!(server.fetched(), vec![(1, 500), (2, 500), (3, 500)]);
    assert_eq!(result.records.len(), 1_200);
}

#[tokio::test]
async fn test_records_are_complete_and_page_size_never_grows() {
    for total in [0_u64, 1, 7, 99, 100, 101, 250, 499, 1_000] {
        for page_size in [1, 3, 10, 100, 500] {
            for desired in [0, 1, 5, 100, 300, 2_000] {
                let server = CollectionServer::new(total);
                let cancel = CancellationToken::new();

                let result = fetch(&server, &cancel, desired, page_size).await.unwrap();

                let expected_len = if desired == 0 {
                    total as usize
                } else {
                    (total as usize).min(desired)
                };
                assert!(
                    result.records.len() >= expected_len,
                    "total={total} page_size={page_size} desired={desired}: got {}",
                    result.records.len()
                );
                assert_eq!(
                    result.records,
                    (1..=result.records.len() as u64).collect::<Vec<_>>(),
                    "total={total} page_size={page_size} desired={desired}: records out of order"
                );

                let sizes: Vec<_> = server.requests().iter().map(|r| r.page_size).collect();
                assert!(
                    sizes.windows(2).all(|w| w[1] <= w[0]),
                    "page size grew: {sizes:?}"
                );
            }
        }
    }
}
