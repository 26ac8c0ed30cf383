//! Pluggable pose-landmark extraction.
//!
//! The landmark model runs outside this process. `RemotePoseEstimator` talks to it
//! over HTTP; `DisabledPoseEstimator` is installed when no service is configured so
//! landmark-only comparison keeps working.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::posture::landmarks::LandmarkSet;

const POSE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PoseEstimator: Send + Sync {
    /// Extracts landmarks from a JPEG image. `Ok(None)` means no person was found.
    async fn estimate(&self, jpeg: &[u8]) -> Result<Option<LandmarkSet>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RemotePoseEstimator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PoseRequest<'a> {
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct PoseResponse {
    #[serde(default)]
    landmarks: Option<LandmarkSet>,
}

/// Calls an HTTP pose service: `POST {"image": "<base64>"}` → `{"landmarks": [[x,y,z], ...] | null}`.
pub struct RemotePoseEstimator {
    client: Client,
    url: String,
}

impl RemotePoseEstimator {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(POSE_REQUEST_TIMEOUT).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PoseEstimator for RemotePoseEstimator {
    async fn estimate(&self, jpeg: &[u8]) -> Result<Option<LandmarkSet>, AppError> {
        let encoded = STANDARD.encode(jpeg);
        let response = self
            .client
            .post(&self.url)
            .json(&PoseRequest { image: &encoded })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("pose service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Pose service returned {status}: {body}");
            return Err(AppError::Upstream(format!("pose service returned {status}")));
        }

        let parsed: PoseResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid pose service reply: {e}")))?;

        debug!(
            "Pose service returned {} landmarks",
            parsed.landmarks.as_ref().map_or(0, LandmarkSet::len)
        );
        Ok(parsed.landmarks.filter(|set| !set.is_empty()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DisabledPoseEstimator
// ────────────────────────────────────────────────────────────────────────────

pub struct DisabledPoseEstimator;

#[async_trait]
impl PoseEstimator for DisabledPoseEstimator {
    async fn estimate(&self, _jpeg: &[u8]) -> Result<Option<LandmarkSet>, AppError> {
        Err(AppError::ServiceUnavailable(
            "Pose detection is not configured (set POSE_SERVICE_URL)".to_string(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;

    /// Returns the same landmarks for every image.
    pub struct FixedPoseEstimator(pub Option<LandmarkSet>);

    #[async_trait]
    impl PoseEstimator for FixedPoseEstimator {
        async fn estimate(&self, _jpeg: &[u8]) -> Result<Option<LandmarkSet>, AppError> {
            Ok(self.0.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posture::landmarks::fixtures::upright;

    #[tokio::test]
    async fn test_disabled_estimator_is_unavailable() {
        let result = DisabledPoseEstimator.estimate(&[0xFF, 0xD8]).await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_fixed_estimator_returns_landmarks() {
        let estimator = fakes::FixedPoseEstimator(Some(upright()));
        let set = estimator.estimate(&[]).await.unwrap().unwrap();
        assert!(set.is_complete());
    }

    #[test]
    fn test_pose_response_accepts_null_landmarks() {
        let parsed: PoseResponse = serde_json::from_str(r#"{"landmarks": null}"#).unwrap();
        assert!(parsed.landmarks.is_none());
        let parsed: PoseResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.landmarks.is_none());
    }

    #[test]
    fn test_pose_response_parses_triples() {
        let parsed: PoseResponse =
            serde_json::from_str(r#"{"landmarks": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6, 0.9]]}"#)
                .unwrap();
        assert_eq!(parsed.landmarks.unwrap().len(), 2);
    }
}
