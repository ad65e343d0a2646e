//! Payload types shared by several *arr applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout the calendar endpoints accept for `start` / `end`.
pub const CALENDAR_TIME_FILTER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format a calendar filter bound.
#[must_use]
pub fn format_calendar_time(time: &DateTime<Utc>) -> String {
    time.format(CALENDAR_TIME_FILTER_FORMAT).to_string()
}

/// A quality, or a group of qualities inside a quality profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quality {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<BaseQuality>,
    /// Nested qualities when this entry is a group.
    #[serde(default)]
    pub items: Vec<Quality>,
    #[serde(default)]
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<QualityRevision>,
}

/// The quality definition itself (name, source, resolution).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseQuality {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

/// Release revision attached to a grabbed or imported quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRevision {
    pub version: i64,
    pub real: i64,
    #[serde(default)]
    pub is_repack: bool,
}

/// An image (poster, fanart, banner) attached to a series, movie or episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub cover_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}
