//! Axum route handlers for summaries, content analysis and study notes.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::analysis::{
    analyze_link, analyze_text, summarize_image, AnalysisType, ImageSummary, LinkAnalysis,
    TextAnalysis,
};
use crate::content::study_note::{render_html, to_html_data_url, NoteContent};
use crate::content::summarize::summarize_text;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Link,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ContentSummary {
    Text(String),
    TextAnalysis(TextAnalysis),
    Image(ImageSummary),
    Link(LinkAnalysis),
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: ContentSummary,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeContentRequest {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: ContentKind,
    pub text: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "analysisType", default)]
    pub analysis_type: AnalysisType,
}

fn default_kind() -> ContentKind {
    ContentKind::Text
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub content: Option<NoteContent>,
}

#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub image: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: &'static str,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/summarize
///
/// Text is previewed locally; images go through the vision model.
pub async fn handle_summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    if let Some(text) = non_empty(request.text) {
        return Ok(Json(SummaryResponse {
            summary: ContentSummary::Text(summarize_text(&text)),
            kind: ContentKind::Text,
        }));
    }

    if let Some(image) = non_empty(request.image) {
        let client = state.openai()?;
        let summary = summarize_image(client, &image).await;
        return Ok(Json(SummaryResponse {
            summary: ContentSummary::Image(summary),
            kind: ContentKind::Image,
        }));
    }

    Err(AppError::Validation("text or image is required".to_string()))
}

/// POST /api/analyze-content
pub async fn handle_analyze_content(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeContentRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let payload = match request.kind {
        ContentKind::Text => non_empty(request.text),
        ContentKind::Image => non_empty(request.image),
        ContentKind::Link => non_empty(request.link),
    }
    .ok_or_else(|| {
        AppError::Validation("a valid content type and matching data are required".to_string())
    })?;

    let client = state.openai()?;
    info!(
        "Analysing {:?} content ({:?} perspective)",
        request.kind, request.analysis_type
    );

    let summary = match request.kind {
        ContentKind::Text => {
            ContentSummary::TextAnalysis(analyze_text(client, &payload, request.analysis_type).await?)
        }
        ContentKind::Image => ContentSummary::Image(summarize_image(client, &payload).await),
        ContentKind::Link => {
            ContentSummary::Link(analyze_link(client, &payload, request.analysis_type).await?)
        }
    };

    Ok(Json(SummaryResponse {
        summary,
        kind: request.kind,
    }))
}

/// POST /api/generate-image
///
/// Renders a study note as HTML and returns it as a data URL.
pub async fn handle_generate_image(
    Json(request): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    let content = request
        .content
        .ok_or_else(|| AppError::Validation("content is required".to_string()))?;

    let html = render_html(&content.into_note());

    Ok(Json(GenerateImageResponse {
        image: to_html_data_url(&html),
        kind: "html",
        message: "Study note generated.",
    }))
}
