use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{API_VERSION, Readarr};
use crate::client::Request;
use crate::error::{Result, StarrError};
use crate::pagination::{Endpoint, Page, PageRequest, PageSource, fetch_all};
use crate::types::Quality;

/// A page (or an accumulation of pages) of Readarr history.
pub type History = Page<HistoryRecord>;

/// One history event. Which `data` members are filled depends on `event_type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    pub id: i64,
    pub book_id: i64,
    pub author_id: i64,
    pub source_title: String,
    pub quality: Option<Quality>,
    pub quality_cutoff_not_met: bool,
    pub date: Option<DateTime<Utc>>,
    pub download_id: String,
    pub event_type: String,
    pub data: HistoryData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryData {
    pub age: String,
    pub age_hours: String,
    pub age_minutes: String,
    pub download_client: String,
    pub download_forced: String,
    pub download_url: String,
    pub dropped_path: String,
    pub guid: String,
    pub imported_path: String,
    pub indexer: String,
    pub message: String,
    pub nzb_info_url: String,
    pub protocol: String,
    pub published_date: Option<DateTime<Utc>>,
    pub reason: String,
    pub release_group: String,
    pub size: String,
    pub status_messages: String,
    pub torrent_info_hash: String,
}

fn history_path() -> String {
    format!("{}/history", API_VERSION)
}

impl Readarr {
    /// Fetch `records` history entries (all of them when zero), `per_page`
    /// at a time, concatenated in server order.
    ///
    /// Use [`Readarr::get_history_page`] for control over a single page.
    pub async fn get_history(&self, records: usize, per_page: usize) -> Result<History> {
        let endpoint = Endpoint::new(&self.client, history_path());
        fetch_all(&endpoint, self.client.cancellation(), records, per_page).await
    }

    pub async fn get_history_page(&self, request: PageRequest) -> Result<History> {
        let endpoint = Endpoint::new(&self.client, history_path());
        endpoint.fetch_page(self.client.cancellation(), request).await
    }

    /// Mark a history item as failed.
    pub async fn fail(&self, history_id: i64) -> Result<()> {
        if history_id < 1 {
            return Err(StarrError::invalid_request(format!(
                "invalid history ID: {}",
                history_id
            )));
        }

        let req = Request::new(format!("{}/failed", history_path()))
            .with_form(format!("id={}", history_id));
        self.client.post_any(&req).await
    }
}
