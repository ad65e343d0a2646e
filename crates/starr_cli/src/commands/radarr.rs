use starr::radarr::Radarr;
use tokio_util::sync::CancellationToken;

use crate::RadarrAction;
use crate::commands::output::print_json;
use crate::commands::shared::build_client;
use crate::config::{App, Config};

pub(crate) async fn handle_radarr(
    action: RadarrAction,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let radarr = Radarr::new(build_client(App::Radarr, config, cancel)?);

    match action {
        RadarrAction::Status => print_json(&radarr.get_system_status().await?)?,
        RadarrAction::CustomFormats => print_json(&radarr.get_custom_formats().await?)?,
    }

    Ok(())
}
