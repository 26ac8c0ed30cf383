//! Axum route handlers for the mock interview flow.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluation::evaluate_answer;
use crate::interview::jobs::{analyze_posting, JobFields, JobInfo};
use crate::interview::questions::generate_questions;
use crate::interview::report::{report_path, write_report, ReportInput};
use crate::interview::selection::{select_questions, Difficulty, InterviewQuestion};
use crate::interview::session::{AnswerRecord, InterviewSession};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub url: Option<String>,
    #[serde(flatten)]
    pub fields: JobFields,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub success: bool,
    pub job_info: JobInfo,
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub num_questions: usize,
    #[serde(default)]
    pub difficulty_level: Difficulty,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub success: bool,
    pub session_id: Uuid,
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub time_taken: u32,
    #[serde(default)]
    pub max_time: u32,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub success: bool,
    pub score: u32,
    pub feedback: String,
    pub next_question: Option<InterviewQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub input: ReportInput,
}

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub filename: String,
    pub download_url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-job-posting
///
/// Never fails: crawl or model errors fall back to default job info and the question bank.
pub async fn handle_analyze_job_posting(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    let url = request.url.filter(|u| !u.trim().is_empty());
    let job_info = match url {
        Some(url) => analyze_posting(state.llm.as_ref(), url.trim()).await,
        None => JobInfo::from_fields(request.fields),
    };

    let questions = generate_questions(state.llm.as_ref(), &job_info).await;
    info!(
        "Prepared {} questions for {} / {}",
        questions.len(),
        job_info.company,
        job_info.position
    );

    Ok(Json(AnalyzeJobResponse {
        success: true,
        job_info,
        questions,
    }))
}

/// POST /api/start-interview
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    if request.num_questions == 0 {
        return Err(AppError::Validation(
            "num_questions must be at least 1".to_string(),
        ));
    }
    if request.questions.is_empty() {
        return Err(AppError::Validation("questions are required".to_string()));
    }

    let selected = select_questions(
        &request.questions,
        request.num_questions,
        request.difficulty_level,
        &mut rand::thread_rng(),
    );
    let session = state.sessions.create(selected, request.difficulty_level);

    Ok(Json(StartInterviewResponse {
        success: true,
        session_id: session.session_id,
        questions: session.questions,
    }))
}

/// GET /api/interview/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<InterviewSession>, AppError> {
    state
        .sessions
        .get(session_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Interview session {session_id} not found")))
}

/// POST /api/submit-answer
///
/// Answers for a known session are recorded; unknown sessions are only scored.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let evaluation = evaluate_answer(
        state.llm.as_ref(),
        &request.question,
        &request.answer,
        request.time_taken,
        request.max_time,
    )
    .await;

    let mut next_question = None;
    if let Some(raw_id) = request.session_id.filter(|s| !s.trim().is_empty()) {
        let record = AnswerRecord {
            question: request.question,
            answer: request.answer,
            score: evaluation.score,
            feedback: evaluation.feedback.clone(),
            time_taken: request.time_taken,
        };
        let progress = Uuid::parse_str(raw_id.trim())
            .ok()
            .and_then(|id| state.sessions.record_answer(id, record));
        match progress {
            Some(progress) => {
                info!(
                    "Session {raw_id}: {}/{} answered",
                    progress.answered, progress.total
                );
                next_question = progress.next_question;
            }
            None => warn!("Answer submitted for unknown interview session {raw_id}"),
        }
    }

    Ok(Json(SubmitAnswerResponse {
        success: true,
        score: evaluation.score,
        feedback: evaluation.feedback,
        next_question,
    }))
}

/// POST /api/generate-report
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<GenerateReportResponse>, AppError> {
    info!(
        "Generating report for session {}: {} questions, {} answers",
        request.session_id.as_deref().unwrap_or("-"),
        request.input.questions.len(),
        request.input.answers.len()
    );

    let filename = write_report(&state.config.report_dir, &request.input).await?;
    let download_url = format!("/api/download-report/{filename}");

    Ok(Json(GenerateReportResponse {
        success: true,
        filename,
        download_url,
    }))
}

/// GET /api/download-report/:filename
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = report_path(&state.config.report_dir, &filename)
        .ok_or_else(|| AppError::Validation("Invalid report file name".to_string()))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Report {filename} not found")));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
