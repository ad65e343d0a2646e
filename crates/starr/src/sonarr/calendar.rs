use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{API_VERSION, Sonarr};
use crate::client::Request;
use crate::error::Result;
use crate::types::{Image, format_calendar_time};

/// Filters for calendar queries. Unset bounds are left to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub unmonitored: bool,
    pub include_series: bool,
    pub include_episode_file: bool,
    pub include_episode_images: bool,
}

impl Calendar {
    fn to_request(&self) -> Request {
        let mut req = Request::new(calendar_path())
            .with_query("unmonitored", self.unmonitored)
            .with_query("includeSeries", self.include_series)
            .with_query("includeEpisodeFile", self.include_episode_file)
            .with_query("includeEpisodeImages", self.include_episode_images);

        if let Some(start) = self.start {
            req.push_query("start", format_calendar_time(&start));
        }
        if let Some(end) = self.end {
            req.push_query("end", format_calendar_time(&end));
        }

        req
    }
}

/// An episode as listed on the calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    pub id: i64,
    pub series_id: i64,
    pub episode_file_id: i64,
    pub season_number: i64,
    pub episode_number: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_date_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub overview: String,
    pub has_file: bool,
    pub monitored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_episode_number: Option<i64>,
    pub unverified_scene_numbering: bool,
    /// Present when the query asked for `includeSeries`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
}

/// The series an episode belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesSummary {
    pub id: i64,
    pub title: String,
    pub title_slug: String,
    pub status: String,
    pub network: String,
    pub year: i64,
    pub tvdb_id: i64,
    pub monitored: bool,
    pub images: Vec<Image>,
}

fn calendar_path() -> String {
    format!("{}/calendar", API_VERSION)
}

impl Sonarr {
    /// Episodes airing within the filter's window.
    pub async fn get_calendar(&self, filter: &Calendar) -> Result<Vec<Episode>> {
        let episodes: Option<Vec<Episode>> = self.client.get_into(&filter.to_request()).await?;
        Ok(episodes.unwrap_or_default())
    }

    /// A single calendar entry.
    pub async fn get_calendar_id(&self, id: i64) -> Result<Episode> {
        self.client
            .get_into(&Request::new(format!("{}/{}", calendar_path(), id)))
            .await
    }
}
