//! Radarr (movies) API, version 3.

mod system;

pub use system::SystemStatus;

use crate::client::StarrClient;
use crate::custom_format::{self, CustomFormat};
use crate::error::Result;

/// API version path segment.
pub const API_VERSION: &str = "v3";

/// Typed Radarr client.
#[derive(Debug, Clone)]
pub struct Radarr {
    client: StarrClient,
}

impl Radarr {
    pub fn new(client: StarrClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StarrClient {
        &self.client
    }

    pub async fn get_custom_formats(&self) -> Result<Vec<CustomFormat>> {
        custom_format::list(&self.client, API_VERSION).await
    }

    /// Create a custom format. `None` returns an empty format without a request.
    pub async fn add_custom_format(&self, format: Option<CustomFormat>) -> Result<CustomFormat> {
        custom_format::add(&self.client, API_VERSION, format).await
    }

    pub async fn update_custom_format(&self, format: &CustomFormat, id: i64) -> Result<CustomFormat> {
        custom_format::update(&self.client, API_VERSION, format, id).await
    }

    pub async fn delete_custom_format(&self, id: i64) -> Result<()> {
        custom_format::delete(&self.client, API_VERSION, id).await
    }
}
