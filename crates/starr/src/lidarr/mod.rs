//! Lidarr (music) API, version 1.

mod quality_profile;

pub use quality_profile::QualityProfile;

use crate::client::StarrClient;

/// API version path segment.
pub const API_VERSION: &str = "v1";

/// Typed Lidarr client.
#[derive(Debug, Clone)]
pub struct Lidarr {
    client: StarrClient,
}

impl Lidarr {
    pub fn new(client: StarrClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StarrClient {
        &self.client
    }
}
