//! Axum route handlers for the wellbeing chat and quote catalogue.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::chat::history::ChatEntry;
use crate::chat::prompts::build_chat_prompt;
use crate::chat::quotes::{random_quote, Emotion};
use crate::errors::AppError;
use crate::llm_client::parse_json_reply;
use crate::state::AppState;

const FALLBACK_REPLY: &str = "죄송해요, 지금은 생각을 정리하는 중이에요. 잠시 후 다시 이야기해 주세요.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub emotion: Emotion,
    pub quote: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatEntry>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub emotion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub emotion: Emotion,
    pub quote: &'static str,
}

/// Structured reply requested from the model.
#[derive(Debug, Deserialize)]
struct ModelReply {
    #[serde(default)]
    emotion: Emotion,
    response: String,
}

/// Reads the model's JSON reply; a plain-text reply is used verbatim as neutral.
fn interpret_reply(raw: &str) -> (Emotion, String) {
    match parse_json_reply::<ModelReply>(raw) {
        Ok(reply) if !reply.response.trim().is_empty() => {
            (reply.emotion, reply.response.trim().to_string())
        }
        _ => (Emotion::Neutral, raw.trim().to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chat
///
/// Upstream failures still answer 200 with an apology so the conversation continues.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let gemini = state.gemini()?;
    let is_first = state.chat.begin_message();
    let prompt = build_chat_prompt(message, is_first);

    let (emotion, reply) = match gemini.generate(&prompt).await {
        Ok(raw) => interpret_reply(&raw),
        Err(e) => {
            error!("Chat generation failed: {e}");
            (Emotion::Neutral, FALLBACK_REPLY.to_string())
        }
    };

    let timestamp = Utc::now();
    state.chat.push(ChatEntry {
        user_message: message.to_string(),
        bot_message: reply.clone(),
        emotion,
        timestamp,
    });
    info!("Chat reply generated (emotion: {emotion})");

    Ok(Json(ChatResponse {
        message: reply,
        emotion,
        quote: random_quote(emotion),
        timestamp,
    }))
}

/// GET /api/history
pub async fn handle_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.chat.snapshot(),
    })
}

/// GET /api/quotes?emotion=
pub async fn handle_quote(Query(query): Query<QuoteQuery>) -> Json<QuoteResponse> {
    let emotion = query
        .emotion
        .as_deref()
        .map(Emotion::parse_lenient)
        .unwrap_or_default();
    Json(QuoteResponse {
        emotion,
        quote: random_quote(emotion),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_json_reply() {
        let (emotion, reply) =
            interpret_reply(r#"{"emotion": "sad", "response": "오늘 많이 힘드셨죠."}"#);
        assert_eq!(emotion, Emotion::Sad);
        assert_eq!(reply, "오늘 많이 힘드셨죠.");
    }

    #[test]
    fn test_interpret_fenced_reply_with_unknown_emotion() {
        let raw = "```json\n{\"emotion\": \"tired\", \"response\": \"쉬어가요.\"}\n```";
        let (emotion, reply) = interpret_reply(raw);
        assert_eq!(emotion, Emotion::Neutral);
        assert_eq!(reply, "쉬어가요.");
    }

    #[test]
    fn test_interpret_plain_text_reply_is_neutral() {
        let (emotion, reply) = interpret_reply("  그냥 평범한 답변이에요.  ");
        assert_eq!(emotion, Emotion::Neutral);
        assert_eq!(reply, "그냥 평범한 답변이에요.");
    }
}
