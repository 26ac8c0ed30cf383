use std::sync::Arc;

use parking_lot::RwLock;

use crate::chat::history::ChatHistory;
use crate::config::Config;
use crate::errors::AppError;
use crate::interview::session::SessionStore;
use crate::llm_client::{GeminiClient, LlmClient, OpenAiClient};
use crate::posture::estimator::PoseEstimator;
use crate::posture::settings::PostureSettings;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Anthropic client for job analysis and interview evaluation. `None` without a key;
    /// those features then fall back to their rule-based paths.
    pub llm: Option<LlmClient>,
    pub openai: Option<OpenAiClient>,
    pub gemini: Option<GeminiClient>,
    /// Pluggable pose estimator. Default: the remote landmark service, or a disabled
    /// estimator answering 503 when `POSE_SERVICE_URL` is unset.
    pub pose: Arc<dyn PoseEstimator>,
    pub sessions: SessionStore,
    pub chat: ChatHistory,
    pub posture_settings: Arc<RwLock<PostureSettings>>,
}

fn unavailable(provider: &str, key: &str) -> AppError {
    AppError::ServiceUnavailable(format!("{provider} is not configured; set {key}"))
}

impl AppState {
    pub fn openai(&self) -> Result<&OpenAiClient, AppError> {
        self.openai
            .as_ref()
            .ok_or_else(|| unavailable("OpenAI", "OPENAI_API_KEY"))
    }

    pub fn gemini(&self) -> Result<&GeminiClient, AppError> {
        self.gemini
            .as_ref()
            .ok_or_else(|| unavailable("Gemini", "GEMINI_API_KEY"))
    }
}

#[cfg(test)]
impl AppState {
    /// State with no providers configured and a disabled pose estimator.
    pub fn for_tests(config: Config) -> Self {
        AppState {
            config,
            llm: None,
            openai: None,
            gemini: None,
            pose: Arc::new(crate::posture::estimator::DisabledPoseEstimator),
            sessions: SessionStore::new(),
            chat: ChatHistory::default(),
            posture_settings: Arc::new(RwLock::new(PostureSettings::default())),
        }
    }
}
