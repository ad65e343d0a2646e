use chrono::{DateTime, NaiveDate, Utc};
use starr::StarrClient;
use tokio_util::sync::CancellationToken;

use crate::config::{App, Config};

/// Build a client for `app` from configuration, wired to the shutdown token.
pub(crate) fn build_client(
    app: App,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<StarrClient, Box<dyn std::error::Error>> {
    let client_config = config.client_config(app)?;
    tracing::debug!(app = %app, url = %client_config.url, "Connecting");

    let client = StarrClient::new(&client_config)?.with_cancellation(cancel.clone());
    Ok(client)
}

/// Page size for history requests: CLI flag, then config.
pub(crate) fn history_page_size(flag: Option<usize>, config: &Config) -> usize {
    flag.unwrap_or(config.history.per_page)
}

/// Midnight UTC at the start of `date`.
pub(crate) fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// Last second of `date`, UTC.
pub(crate) fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}
