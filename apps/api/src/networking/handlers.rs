//! Axum route handler for the networking assistant.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::openai::{ChatOptions, CHAT_MODEL};
use crate::networking::prompts::{
    BASE_TEMPLATE, EMAIL_INSTRUCTIONS, GENERIC_INSTRUCTIONS, LINKEDIN_INSTRUCTIONS,
    NETWORKING_SYSTEM, SIMULATION_INSTRUCTIONS,
};
use crate::state::AppState;

const NETWORKING_OPTIONS: ChatOptions = ChatOptions::new(1000, 0.7);
const DEFAULT_USER_NAME: &str = "지원자";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UserContext {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NetworkingRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub input: Option<String>,
    #[serde(default)]
    pub user_context: UserContext,
}

#[derive(Debug, Serialize)]
pub struct NetworkingResponse {
    pub success: bool,
    pub result: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// What the user wants drafted. Unrecognised types get generic help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Linkedin,
    Email,
    Simulation,
    Other,
}

impl RequestKind {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "linkedin" => RequestKind::Linkedin,
            "email" => RequestKind::Email,
            "simulation" => RequestKind::Simulation,
            _ => RequestKind::Other,
        }
    }
}

pub fn build_prompt(kind: &str, input: &str, name: &str) -> String {
    let instructions = match RequestKind::parse(kind) {
        RequestKind::Linkedin => LINKEDIN_INSTRUCTIONS,
        RequestKind::Email => EMAIL_INSTRUCTIONS,
        RequestKind::Simulation => SIMULATION_INSTRUCTIONS,
        RequestKind::Other => GENERIC_INSTRUCTIONS,
    };

    let base = BASE_TEMPLATE
        .replace("{name}", name)
        .replace("{kind}", kind)
        .replace("{input}", input);
    format!("{base}{}", instructions.replace("{name}", name))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/networking-ai
pub async fn handle_networking(
    State(state): State<AppState>,
    Json(request): Json<NetworkingRequest>,
) -> Result<Json<NetworkingResponse>, AppError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(kind), Some(input)) = (non_empty(request.kind), non_empty(request.input)) else {
        return Err(AppError::Validation("type and input are required".to_string()));
    };

    let client = state.openai()?;
    let name = request
        .user_context
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());

    info!("Networking request: type={kind}");
    let prompt = build_prompt(&kind, &input, &name);
    let result = client
        .chat(Some(NETWORKING_SYSTEM), &prompt, NETWORKING_OPTIONS)
        .await?;

    Ok(Json(NetworkingResponse {
        success: true,
        result,
        provider: format!("OpenAI {CHAT_MODEL}"),
        kind,
    }))
}
