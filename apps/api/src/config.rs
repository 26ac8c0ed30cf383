use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_CONTENT_LENGTH: usize = 100 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// API keys are optional: features backed by a missing provider answer 503.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub cors_origin: String,
    pub upload_dir: PathBuf,
    pub report_dir: PathBuf,
    pub max_content_length: usize,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub pose_service_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            report_dir: optional_env("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_content_length: match optional_env("MAX_CONTENT_LENGTH") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_CONTENT_LENGTH must be a byte count")?,
                None => DEFAULT_MAX_CONTENT_LENGTH,
            },
            openai_api_key: optional_env("OPENAI_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            pose_service_url: optional_env("POSE_SERVICE_URL"),
        })
    }

    /// Directory holding captured baseline posture images.
    pub fn posture_dir(&self) -> PathBuf {
        self.upload_dir.join("posture")
    }
}

/// Reads an env var, treating unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Config pointing all file output at `dir`, with no providers configured.
    pub fn for_tests(dir: &std::path::Path) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            upload_dir: dir.join("uploads"),
            report_dir: dir.join("reports"),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_api_key: None,
            pose_service_url: None,
        }
    }
}
