use console::Term;
use starr::readarr::Readarr;
use tokio_util::sync::CancellationToken;

use crate::ReadarrAction;
use crate::commands::output::HistoryRow;
use crate::commands::shared::{build_client, history_page_size};
use crate::config::{App, Config};

pub(crate) async fn handle_readarr(
    action: ReadarrAction,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let readarr = Readarr::new(build_client(App::Readarr, config, cancel)?);

    match action {
        ReadarrAction::History { opts } => {
            let per_page = history_page_size(opts.per_page, config);
            let history = readarr.get_history(opts.records, per_page).await?;
            tracing::info!(
                fetched = history.records.len(),
                total = history.total_records,
                "Fetched Readarr history"
            );

            let rows = history.records.iter().map(HistoryRow::from).collect();
            HistoryRow::print_many(rows, history.total_records, opts.output)?;
        }
        ReadarrAction::Fail { id } => {
            readarr.fail(id).await?;
            if Term::stdout().is_term() {
                println!("Marked history item {} as failed.", id);
            } else {
                tracing::info!(id, "Marked history item as failed");
            }
        }
    }

    Ok(())
}
