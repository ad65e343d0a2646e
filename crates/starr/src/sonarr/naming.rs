use serde::{Deserialize, Serialize};

use super::{API_VERSION, Sonarr};
use crate::client::Request;
use crate::error::Result;

/// Episode and folder naming settings.
///
/// Every field is optional so updates can send only what changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Naming {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename_episodes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_illegal_characters: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_episode_style: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_episode_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_episode_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anime_episode_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_folder_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_folder_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specials_folder_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_series_title: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_episode_title: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_quality: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_spaces: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

fn naming_path() -> String {
    format!("{}/config/naming", API_VERSION)
}

impl Sonarr {
    pub async fn get_naming(&self) -> Result<Naming> {
        self.client.get_into(&Request::new(naming_path())).await
    }

    /// Apply `naming` and return the resulting settings.
    pub async fn update_naming(&self, naming: &Naming) -> Result<Naming> {
        let req = Request::new(naming_path()).with_json(naming)?;
        self.client.put_into(&req).await
    }
}
