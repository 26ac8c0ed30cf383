//! Axum route handler for self-introduction drafting.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::crawl;
use crate::errors::AppError;
use crate::llm_client::openai::{ChatOptions, OpenAiClient};
use crate::posture::image;
use crate::self_intro::extract::extract_text;
use crate::self_intro::generator::{draft_answers, DraftAnswer};
use crate::self_intro::prompts::IMAGE_QUESTIONS_PROMPT;
use crate::state::AppState;

const VISION_OPTIONS: ChatOptions = ChatOptions::new(500, 0.1);
const QUESTION_IMAGE_MAX_SIDE: u32 = 1024;
/// Vision replies this short are treated as "nothing found".
const MIN_VISION_CHARS: usize = 30;
const QUESTION_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// The multipart form. Empty fields and empty files count as absent.
#[derive(Debug, Default)]
pub struct AnswerForm {
    pub resume: Option<UploadedFile>,
    pub question_text: Option<String>,
    pub question_image: Option<UploadedFile>,
    pub question_file: Option<UploadedFile>,
    pub question_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateAnswerResponse {
    pub success: bool,
    pub total_questions: usize,
    pub answers: BTreeMap<u32, DraftAnswer>,
    pub original_question: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart) -> Result<AnswerForm, AppError> {
    let mut form = AnswerForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "question_image" | "question_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }
                let file = Some(UploadedFile { filename, bytes });
                match name.as_str() {
                    "resume" => form.resume = file,
                    "question_image" => form.question_image = file,
                    _ => form.question_file = file,
                }
            }
            "question_text" | "question_url" => {
                let value = field.text().await?;
                let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                if name == "question_text" {
                    form.question_text = value;
                } else {
                    form.question_url = value;
                }
            }
            other => warn!("Ignoring unexpected form field {other:?}"),
        }
    }

    Ok(form)
}

/// Runs text extraction off the async runtime.
async fn extract_upload(file: UploadedFile) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_text(&file.filename, &file.bytes))
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("file could not be read: {e}")))?
        .map_err(AppError::from)
}

/// Whether a vision reply plausibly lists questions.
pub fn vision_reply_accepted(reply: &str) -> bool {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let numbered = NUMBERED.get_or_init(|| Regex::new(r"\d+\.").expect("static regex is valid"));

    let lower = reply.to_lowercase();
    reply.chars().count() > MIN_VISION_CHARS
        && (numbered.is_match(reply) || lower.contains("question") || reply.contains("질문"))
}

async fn questions_from_image(client: &OpenAiClient, file: UploadedFile) -> Result<String, AppError> {
    let jpeg = tokio::task::spawn_blocking(move || {
        let img = image::load(&file.bytes)?;
        image::to_jpeg(&image::fit_within(img, QUESTION_IMAGE_MAX_SIDE))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;

    let reply = client
        .vision(IMAGE_QUESTIONS_PROMPT, &image::to_data_url(&jpeg), VISION_OPTIONS)
        .await?;
    let reply = reply.trim().to_string();

    if vision_reply_accepted(&reply) {
        Ok(reply)
    } else {
        warn!("Vision reply did not contain questions: {reply:?}");
        Err(AppError::Validation(
            "No questions could be read from the image".to_string(),
        ))
    }
}

/// Resolves the question text from the first source present:
/// text, then image, then file, then URL.
async fn resolve_question_text(
    client: &OpenAiClient,
    form: AnswerForm,
) -> Result<Option<String>, AppError> {
    if let Some(text) = form.question_text {
        return Ok(Some(text));
    }
    if let Some(file) = form.question_image {
        return questions_from_image(client, file).await.map(Some);
    }
    if let Some(file) = form.question_file {
        return extract_upload(file).await.map(Some);
    }
    if let Some(url) = form.question_url {
        let page = crawl::fetch_page(&url, QUESTION_PAGE_TIMEOUT).await?;
        return Ok(Some(page.text));
    }
    Ok(None)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-answer
///
/// Multipart form: `resume` file plus one of `question_text`, `question_image`,
/// `question_file` or `question_url`.
pub async fn handle_generate_answer(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateAnswerResponse>, AppError> {
    let client = state.openai()?;
    let mut form = read_form(multipart).await?;

    let resume = match form.resume.take() {
        Some(file) => extract_upload(file).await?,
        None => String::new(),
    };

    let question = resolve_question_text(client, form)
        .await?
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation(
                "Provide the questions as text, an image, a file or a URL".to_string(),
            )
        })?;

    if resume.trim().is_empty() {
        return Err(AppError::Validation("Upload a résumé file".to_string()));
    }

    info!(
        "Drafting self-introduction: resume {} chars, questions {} chars",
        resume.chars().count(),
        question.chars().count()
    );
    let drafts = draft_answers(client, &resume, &question).await?;

    Ok(Json(GenerateAnswerResponse {
        success: true,
        total_questions: drafts.total_questions,
        answers: drafts.answers,
        original_question: question,
    }))
}
