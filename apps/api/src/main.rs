mod chat;
mod config;
mod content;
mod crawl;
mod errors;
mod files;
mod interview;
mod llm_client;
mod networking;
mod pdf;
mod posture;
mod routes;
mod self_intro;
mod state;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::history::ChatHistory;
use crate::config::Config;
use crate::interview::session::SessionStore;
use crate::llm_client::{GeminiClient, LlmClient, OpenAiClient};
use crate::posture::estimator::{DisabledPoseEstimator, PoseEstimator, RemotePoseEstimator};
use crate::posture::settings::PostureSettings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerWell API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(config.posture_dir())
        .await
        .with_context(|| format!("creating {}", config.posture_dir().display()))?;
    tokio::fs::create_dir_all(&config.report_dir)
        .await
        .with_context(|| format!("creating {}", config.report_dir.display()))?;

    // Initialize AI provider clients; each is optional
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            info!("Anthropic client initialized (model: {})", llm_client::MODEL);
            Some(LlmClient::new(key.clone())?)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; interview features use rule-based fallbacks");
            None
        }
    };
    let openai = match &config.openai_api_key {
        Some(key) => Some(OpenAiClient::new(key.clone())?),
        None => {
            warn!("OPENAI_API_KEY not set; content, networking and self-intro endpoints answer 503");
            None
        }
    };
    let gemini = match &config.gemini_api_key {
        Some(key) => Some(GeminiClient::new(key.clone())?),
        None => {
            warn!("GEMINI_API_KEY not set; chat answers 503");
            None
        }
    };

    // Initialize pose estimator (remote landmark service when configured)
    let pose: Arc<dyn PoseEstimator> = match &config.pose_service_url {
        Some(url) => {
            info!("Pose estimation via {url}");
            Arc::new(RemotePoseEstimator::new(url.clone())?)
        }
        None => {
            warn!("POSE_SERVICE_URL not set; posture endpoints that need detection answer 503");
            Arc::new(DisabledPoseEstimator)
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        openai,
        gemini,
        pose,
        sessions: SessionStore::new(),
        chat: ChatHistory::default(),
        posture_settings: Arc::new(RwLock::new(PostureSettings::default())),
    };

    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("CORS_ORIGIN is not a valid origin: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
