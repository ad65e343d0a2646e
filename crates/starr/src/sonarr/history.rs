use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{API_VERSION, Sonarr};
use crate::error::Result;
use crate::pagination::{Endpoint, Page, PageRequest, PageSource, fetch_all};
use crate::types::Quality;

/// A page (or an accumulation of pages) of Sonarr history.
pub type History = Page<HistoryRecord>;

/// One grab, import or failure event.
///
/// `data` differs per event type, so it is kept as a loose map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    pub id: i64,
    pub episode_id: i64,
    pub series_id: i64,
    pub source_title: String,
    pub language: Option<serde_json::Value>,
    pub quality: Option<Quality>,
    pub quality_cutoff_not_met: bool,
    pub date: Option<DateTime<Utc>>,
    pub download_id: Option<String>,
    pub event_type: String,
    pub data: BTreeMap<String, serde_json::Value>,
}

fn history_path() -> String {
    format!("{}/history", API_VERSION)
}

impl Sonarr {
    /// Fetch `records` history entries (all of them when zero), `per_page`
    /// at a time.
    pub async fn get_history(&self, records: usize, per_page: usize) -> Result<History> {
        let endpoint = Endpoint::new(&self.client, history_path());
        fetch_all(&endpoint, self.client.cancellation(), records, per_page).await
    }

    /// A single page of history.
    pub async fn get_history_page(&self, request: PageRequest) -> Result<History> {
        let endpoint = Endpoint::new(&self.client, history_path());
        endpoint.fetch_page(self.client.cancellation(), request).await
    }
}
