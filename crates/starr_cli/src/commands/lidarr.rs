use starr::lidarr::Lidarr;
use tokio_util::sync::CancellationToken;

use crate::LidarrAction;
use crate::commands::output::print_json;
use crate::commands::shared::build_client;
use crate::config::{App, Config};

pub(crate) async fn handle_lidarr(
    action: LidarrAction,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let lidarr = Lidarr::new(build_client(App::Lidarr, config, cancel)?);

    match action {
        LidarrAction::QualityProfiles => print_json(&lidarr.get_quality_profiles().await?)?,
    }

    Ok(())
}
