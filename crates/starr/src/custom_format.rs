//! Custom formats, shared by Sonarr and Radarr.
//!
//! Both applications expose the same `customFormat` resource under their own
//! API version, so the CRUD calls live here once and take that version.

use serde::{Deserialize, Serialize};

use crate::client::{Request, StarrClient};
use crate::error::Result;

const CUSTOM_FORMAT: &str = "customFormat";

/// A custom format definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFormat {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "includeCustomFormatWhenRenaming")]
    pub include_when_renaming: bool,
    #[serde(default)]
    pub specifications: Vec<CustomFormatSpec>,
}

/// One matching condition of a custom format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFormatSpec {
    pub name: String,
    pub implementation: String,
    #[serde(default)]
    pub implementation_name: String,
    #[serde(default)]
    pub info_link: String,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub fields: Vec<CustomFormatField>,
}

/// A field of a custom format specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFormatField {
    #[serde(default)]
    pub order: i64,
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Usually a string, sometimes a number.
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub advanced: bool,
}

fn base_path(version: &str) -> String {
    format!("{}/{}", version, CUSTOM_FORMAT)
}

pub(crate) async fn list(client: &StarrClient, version: &str) -> Result<Vec<CustomFormat>> {
    let formats: Option<Vec<CustomFormat>> =
        client.get_into(&Request::new(base_path(version))).await?;
    Ok(formats.unwrap_or_default())
}

pub(crate) async fn add(
    client: &StarrClient,
    version: &str,
    format: Option<CustomFormat>,
) -> Result<CustomFormat> {
    let Some(mut format) = format else {
        return Ok(CustomFormat::default());
    };

    // The server assigns the id.
    format.id = 0;

    let req = Request::new(base_path(version)).with_json(&format)?;
    client.post_into(&req).await
}

pub(crate) async fn update(
    client: &StarrClient,
    version: &str,
    format: &CustomFormat,
    id: i64,
) -> Result<CustomFormat> {
    let id = if id == 0 { format.id } else { id };
    let req = Request::new(format!("{}/{}", base_path(version), id)).with_json(format)?;
    client.put_into(&req).await
}

pub(crate) async fn delete(client: &StarrClient, version: &str, id: i64) -> Result<()> {
    client
        .delete_any(&Request::new(format!("{}/{}", base_path(version), id)))
        .await
}
