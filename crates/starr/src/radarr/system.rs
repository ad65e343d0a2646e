use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{API_VERSION, Radarr};
use crate::client::Request;
use crate::error::Result;

/// Output of `system/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    pub app_data: String,
    pub app_name: String,
    pub authentication: String,
    pub branch: String,
    pub build_time: Option<DateTime<Utc>>,
    pub database_type: String,
    pub database_version: String,
    pub instance_name: String,
    pub is_admin: bool,
    pub is_debug: bool,
    pub is_docker: bool,
    pub is_linux: bool,
    pub is_net_core: bool,
    pub is_osx: bool,
    pub is_production: bool,
    pub is_user_interactive: bool,
    pub is_windows: bool,
    pub migration_version: i64,
    pub mode: String,
    pub os_name: String,
    pub package_author: String,
    pub package_update_mechanism: String,
    pub package_version: String,
    pub runtime_name: String,
    pub runtime_version: String,
    pub start_time: Option<DateTime<Utc>>,
    pub startup_path: String,
    pub url_base: String,
    pub version: String,
}

impl Radarr {
    pub async fn get_system_status(&self) -> Result<SystemStatus> {
        self.client
            .get_into(&Request::new(format!("{}/system/status", API_VERSION)))
            .await
    }
}
