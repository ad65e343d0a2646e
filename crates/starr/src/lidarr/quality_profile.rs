use serde::{Deserialize, Serialize};

use super::{API_VERSION, Lidarr};
use crate::client::Request;
use crate::error::Result;
use crate::types::Quality;

/// A quality profile: which qualities are wanted, and where upgrades stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfile {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub upgrade_allowed: bool,
    #[serde(default)]
    pub cutoff: i64,
    #[serde(default, rename = "items")]
    pub qualities: Vec<Quality>,
}

fn profile_path() -> String {
    format!("{}/qualityProfile", API_VERSION)
}

impl Lidarr {
    pub async fn get_quality_profiles(&self) -> Result<Vec<QualityProfile>> {
        let profiles: Option<Vec<QualityProfile>> =
            self.client.get_into(&Request::new(profile_path())).await?;
        Ok(profiles.unwrap_or_default())
    }

    /// Create a profile and return the id the server assigned.
    pub async fn add_quality_profile(&self, profile: &QualityProfile) -> Result<i64> {
        let req = Request::new(profile_path()).with_json(profile)?;
        let created: QualityProfile = self.client.post_into(&req).await?;
        Ok(created.id)
    }

    /// Replace the profile identified by `profile.id`.
    pub async fn update_quality_profile(&self, profile: &QualityProfile) -> Result<()> {
        let req =
            Request::new(format!("{}/{}", profile_path(), profile.id)).with_json(profile)?;
        self.client.put_any(&req).await
    }

    pub async fn delete_quality_profile(&self, id: i64) -> Result<()> {
        self.client
            .delete_any(&Request::new(format!("{}/{}", profile_path(), id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StarrClient;
    use crate::http::{HttpMethod, MockTransport};
    use std::sync::Arc;

    const HOST: &str = "http://lidarr.test";

    const PROFILE_BODY: &str = r#"{
        "id": 2,
        "name": "Lossless",
        "upgradeAllowed": true,
        "cutoff": 6,
        "items": [
            {"quality": {"id": 6, "name": "FLAC"}, "items": [], "allowed": true},
            {"quality": {"id": 4, "name": "MP3-320"}, "items": [], "allowed": false}
        ]
    }"#;

    fn lidarr(transport: &MockTransport) -> Lidarr {
        Lidarr::new(StarrClient::new_with_transport(
            HOST,
            "mockAPIkey",
            Arc::new(transport.clone()),
        ))
    }

    #[tokio::test]
    async fn test_get_quality_profiles() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            format!("{HOST}/api/v1/qualityProfile"),
            200,
            format!("[{PROFILE_BODY}]"),
        );

        let profiles = lidarr(&transport)
            .get_quality_profiles()
            .await
            .expect("profiles should load");

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "Lossless");
        assert_eq!(profiles[0].qualities.len(), 2);
        assert!(profiles[0].qualities[0].allowed);
    }

    #[tokio::test]
    async fn test_add_quality_profile_returns_new_id() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Post,
            format!("{HOST}/api/v1/qualityProfile"),
            201,
            PROFILE_BODY,
        );

        let profile: QualityProfile = serde_json::from_str(PROFILE_BODY).expect("profile");
        let id = lidarr(&transport)
            .add_quality_profile(&QualityProfile { id: 0, ..profile })
            .await
            .expect("add should succeed");

        assert_eq!(id, 2);
        let sent: serde_json::Value =
            serde_json::from_slice(&transport.requests()[0].body).expect("body should be json");
        assert_eq!(sent["items"][0]["quality"]["name"], serde_json::json!("FLAC"));
    }

    #[tokio::test]
    async fn test_update_quality_profile_puts_to_profile_id() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Put,
            format!("{HOST}/api/v1/qualityProfile/2"),
            202,
            PROFILE_BODY,
        );

        let profile: QualityProfile = serde_json::from_str(PROFILE_BODY).expect("profile");
        lidarr(&transport)
            .update_quality_profile(&profile)
            .await
            .expect("update should succeed");

        assert_eq!(transport.requests()[0].method, HttpMethod::Put);
    }

    #[tokio::test]
    async fn test_delete_quality_profile_404() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Delete,
            format!("{HOST}/api/v1/qualityProfile/8"),
            404,
            r#"{"message": "NotFound"}"#,
        );

        let err = lidarr(&transport)
            .delete_quality_profile(8)
            .await
            .expect_err("404 should fail");
        assert!(err.is_invalid_status());
    }
}
