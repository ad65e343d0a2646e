//! Readarr (books) API, version 1.

mod history;

pub use history::{History, HistoryData, HistoryRecord};

use crate::client::StarrClient;

/// API version path segment.
pub const API_VERSION: &str = "v1";

/// Typed Readarr client.
#[derive(Debug, Clone)]
pub struct Readarr {
    client: StarrClient,
}

impl Readarr {
    pub fn new(client: StarrClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StarrClient {
        &self.client
    }
}
