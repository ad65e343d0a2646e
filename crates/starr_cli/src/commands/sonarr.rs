use starr::sonarr::{Calendar, Sonarr};
use tokio_util::sync::CancellationToken;

use crate::SonarrAction;
use crate::commands::output::{HistoryRow, print_json};
use crate::commands::shared::{build_client, end_of_day, history_page_size, start_of_day};
use crate::config::{App, Config};

pub(crate) async fn handle_sonarr(
    action: SonarrAction,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let sonarr = Sonarr::new(build_client(App::Sonarr, config, cancel)?);

    match action {
        SonarrAction::CustomFormats => {
            print_json(&sonarr.get_custom_formats().await?)?;
        }
        SonarrAction::Naming => {
            print_json(&sonarr.get_naming().await?)?;
        }
        SonarrAction::Calendar {
            start,
            end,
            unmonitored,
        } => {
            let filter = Calendar {
                start: start.and_then(start_of_day),
                end: end.and_then(end_of_day),
                unmonitored,
                include_series: true,
                ..Calendar::default()
            };
            print_json(&sonarr.get_calendar(&filter).await?)?;
        }
        SonarrAction::History { opts } => {
            let per_page = history_page_size(opts.per_page, config);
            let history = sonarr.get_history(opts.records, per_page).await?;
            tracing::info!(
                fetched = history.records.len(),
                total = history.total_records,
                "Fetched Sonarr history"
            );

            let rows = history.records.iter().map(HistoryRow::from).collect();
            HistoryRow::print_many(rows, history.total_records, opts.output)?;
        }
    }

    Ok(())
}
