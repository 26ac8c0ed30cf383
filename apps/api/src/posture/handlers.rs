//! Axum route handlers for the posture monitor.

use ::image::DynamicImage;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::posture::comparison::{compare, MovementThreshold, PostureComparison};
use crate::posture::image::{self, ImagePayloadError};
use crate::posture::landmarks::LandmarkSet;
use crate::posture::scoring::{posture_score, PostureStatus};
use crate::posture::settings::PostureSettings;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub message: &'static str,
    pub posture_score: f64,
    pub status: PostureStatus,
    pub filename: String,
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub base_image: Option<String>,
    pub current_image: Option<String>,
    pub base_landmarks: Option<LandmarkSet>,
    pub current_landmarks: Option<LandmarkSet>,
    pub movement_threshold: Option<MovementThreshold>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub comparison: PostureComparison,
}

#[derive(Debug, Serialize)]
pub struct LandmarksResponse {
    pub success: bool,
    pub landmarks: LandmarkSet,
    pub landmark_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DrawLandmarksResponse {
    pub success: bool,
    pub image: String,
    pub landmark_count: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_image(image: Option<String>, field: &str) -> Result<String, AppError> {
    image
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Decodes the payload into a JPEG ready for storage and pose detection.
/// Decoding and re-encoding run off the async runtime.
async fn prepare_jpeg(payload: String) -> Result<(DynamicImage, Vec<u8>), AppError> {
    let prepared = tokio::task::spawn_blocking(move || {
        let bytes = image::decode_base64_image(&payload)?;
        let img = image::load(&bytes)?;
        let jpeg = image::to_jpeg(&img)?;
        Ok::<_, ImagePayloadError>((img, jpeg))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;
    Ok(prepared)
}

/// Draws the landmarks and re-encodes the result off the async runtime.
async fn annotate(img: DynamicImage, landmarks: LandmarkSet) -> Result<Vec<u8>, AppError> {
    let encoded = tokio::task::spawn_blocking(move || {
        let annotated = DynamicImage::ImageRgb8(image::draw_landmarks(&img, &landmarks));
        image::to_jpeg(&annotated)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;
    Ok(encoded)
}

async fn detect(state: &AppState, jpeg: &[u8]) -> Result<LandmarkSet, AppError> {
    state
        .pose
        .estimate(jpeg)
        .await?
        .ok_or_else(|| AppError::Validation("No person was detected in the image".to_string()))
}

async fn landmarks_for(
    state: &AppState,
    landmarks: Option<LandmarkSet>,
    image: Option<String>,
    field: &str,
) -> Result<LandmarkSet, AppError> {
    if let Some(set) = landmarks {
        return Ok(set);
    }
    let payload = require_image(image, field)?;
    let (_, jpeg) = prepare_jpeg(payload).await?;
    detect(state, &jpeg).await
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/posture/setup
///
/// Scores the baseline pose and stores the image for later comparison.
pub async fn handle_setup(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<SetupResponse>, AppError> {
    let payload = require_image(request.image, "image")?;
    let (_, jpeg) = prepare_jpeg(payload).await?;
    let landmarks = detect(&state, &jpeg).await?;

    let score = posture_score(&landmarks);
    let path = image::save_baseline(&state.config.posture_dir(), &jpeg).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!("Saved baseline posture {filename} (score {score:.2})");

    Ok(Json(SetupResponse {
        message: "Baseline posture saved.",
        posture_score: score,
        status: PostureStatus::from_score(score),
        filename,
        file_path: path.to_string_lossy().into_owned(),
    }))
}

/// POST /api/posture/analyze
///
/// Compares the current pose with the baseline. Landmarks in the body win over images.
/// Without an explicit tier the stored monitor setting is used.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let tier = request
        .movement_threshold
        .unwrap_or_else(|| state.posture_settings.read().movement_threshold);

    let base = landmarks_for(&state, request.base_landmarks, request.base_image, "base_image").await?;
    let current = landmarks_for(
        &state,
        request.current_landmarks,
        request.current_image,
        "current_image",
    )
    .await?;

    let comparison = compare(base, current, tier);
    info!(
        "Posture comparison: difference={:.3} status={:?} tier={}",
        comparison.difference, comparison.status, tier
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        comparison,
    }))
}

/// POST /api/posture/landmarks
pub async fn handle_landmarks(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<LandmarksResponse>, AppError> {
    let payload = require_image(request.image, "image")?;
    let (_, jpeg) = prepare_jpeg(payload).await?;
    let landmarks = detect(&state, &jpeg).await?;

    Ok(Json(LandmarksResponse {
        success: true,
        landmark_count: landmarks.len(),
        landmarks,
    }))
}

/// POST /api/posture/draw-landmarks
pub async fn handle_draw_landmarks(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<DrawLandmarksResponse>, AppError> {
    let payload = require_image(request.image, "image")?;
    let (img, jpeg) = prepare_jpeg(payload).await?;
    let landmarks = detect(&state, &jpeg).await?;
    let landmark_count = landmarks.len();

    let encoded = annotate(img, landmarks).await?;

    Ok(Json(DrawLandmarksResponse {
        success: true,
        image: image::to_data_url(&encoded),
        landmark_count,
    }))
}

/// GET /api/posture/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<PostureSettings> {
    Json(state.posture_settings.read().clone())
}

/// POST /api/posture/settings
pub async fn handle_save_settings(
    State(state): State<AppState>,
    Json(settings): Json<PostureSettings>,
) -> Json<PostureSettings> {
    let settings = settings.normalized();
    *state.posture_settings.write() = settings.clone();
    info!("Posture settings updated: {settings:?}");
    Json(settings)
}

/// GET /api/posture/hello
pub async fn handle_hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Posture alert service is ready!",
    })
}
