use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use starr::Quality;

/// Output format for listings.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Print any payload as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One history event, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, tabled::Tabled)]
pub(crate) struct HistoryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Event")]
    #[serde(rename = "event")]
    pub event_type: String,
    #[tabled(rename = "Quality")]
    pub quality: String,
    #[tabled(rename = "Title")]
    pub title: String,
}

impl HistoryRow {
    fn new(
        id: i64,
        date: Option<DateTime<Utc>>,
        event_type: &str,
        quality: Option<&Quality>,
        title: &str,
    ) -> Self {
        Self {
            id,
            date: date
                .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
            event_type: event_type.to_string(),
            quality: quality_name(quality),
            title: title.to_string(),
        }
    }

    pub(crate) fn print_many(
        items: Vec<Self>,
        total: usize,
        format: OutputFormat,
    ) -> Result<(), serde_json::Error> {
        match format {
            OutputFormat::Table => {
                let shown = items.len();
                let mut table = tabled::Table::new(items);
                table.with(tabled::settings::Style::rounded());
                println!("{}", table);
                println!("{} of {} records", shown, total);
            }
            OutputFormat::Json => print_json(&items)?,
        }
        Ok(())
    }
}

impl From<&starr::sonarr::HistoryRecord> for HistoryRow {
    fn from(record: &starr::sonarr::HistoryRecord) -> Self {
        Self::new(
            record.id,
            record.date,
            &record.event_type,
            record.quality.as_ref(),
            &record.source_title,
        )
    }
}

impl From<&starr::readarr::HistoryRecord> for HistoryRow {
    fn from(record: &starr::readarr::HistoryRecord) -> Self {
        Self::new(
            record.id,
            record.date,
            &record.event_type,
            record.quality.as_ref(),
            &record.source_title,
        )
    }
}

fn quality_name(quality: Option<&Quality>) -> String {
    quality
        .and_then(|q| {
            q.quality
                .as_ref()
                .map(|base| base.name.clone())
                .or_else(|| q.name.clone())
        })
        .unwrap_or_else(|| "-".to_string())
}
