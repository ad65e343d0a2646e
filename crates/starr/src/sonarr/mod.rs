//! Sonarr (TV series) API, version 3.

mod calendar;
mod history;
mod naming;

pub use calendar::{Calendar, Episode, SeriesSummary};
pub use history::{History, HistoryRecord};
pub use naming::Naming;

use crate::client::StarrClient;
use crate::custom_format::{self, CustomFormat};
use crate::error::Result;

/// API version path segment.
pub const API_VERSION: &str = "v3";

/// Typed Sonarr client.
#[derive(Debug, Clone)]
pub struct Sonarr {
    client: StarrClient,
}

impl Sonarr {
    pub fn new(client: StarrClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StarrClient {
        &self.client
    }

    /// All configured custom formats.
    pub async fn get_custom_formats(&self) -> Result<Vec<CustomFormat>> {
        custom_format::list(&self.client, API_VERSION).await
    }

    /// Create a custom format and return it with its new id.
    ///
    /// `None` returns an empty format without contacting the server.
    pub async fn add_custom_format(&self, format: Option<CustomFormat>) -> Result<CustomFormat> {
        custom_format::add(&self.client, API_VERSION, format).await
    }

    /// Replace custom format `id`, or `format.id` when `id` is zero.
    pub async fn update_custom_format(&self, format: &CustomFormat, id: i64) -> Result<CustomFormat> {
        custom_format::update(&self.client, API_VERSION, format, id).await
    }

    pub async fn delete_custom_format(&self, id: i64) -> Result<()> {
        custom_format::delete(&self.client, API_VERSION, id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::http::MockTransport;
    use std::sync::Arc;

    pub const HOST: &str = "http://sonarr.test";

    pub fn sonarr(transport: &MockTransport) -> Sonarr {
        Sonarr::new(StarrClient::new_with_transport(
            HOST,
            "mockAPIkey",
            Arc::new(transport.clone()),
        ))
    }
}
