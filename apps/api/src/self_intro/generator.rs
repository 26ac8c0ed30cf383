//! Drafts one self-introduction answer per question.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::openai::{ChatOptions, OpenAiClient};
use crate::llm_client::LlmError;
use crate::self_intro::prompts::ANSWER_TEMPLATE;
use crate::self_intro::questions::parse_questions;

const ANSWER_OPTIONS: ChatOptions = ChatOptions::new(800, 0.7);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftSet {
    pub total_questions: usize,
    /// Keyed by 1-based question number. Skipped questions leave gaps.
    pub answers: BTreeMap<u32, DraftAnswer>,
}

/// A reply where the model declined to answer instead of drafting.
pub fn is_refusal(reply: &str) -> bool {
    let korean = reply.contains("죄송합니다") && reply.contains("이해할 수 없는");
    let lower = reply.to_lowercase();
    let english = lower.contains("i'm sorry")
        && (lower.contains("can't help") || lower.contains("cannot help"));
    korean || english
}

pub fn build_answer_prompt(all_questions: &str, resume: &str, question: &str) -> String {
    ANSWER_TEMPLATE
        .replace("{all_questions}", all_questions)
        .replace("{resume}", resume)
        .replace("{question}", question)
}

/// Parses the questions out of `question_text` and drafts an answer to each from the résumé.
pub async fn draft_answers(
    client: &OpenAiClient,
    resume: &str,
    question_text: &str,
) -> Result<DraftSet, LlmError> {
    let questions = parse_questions(client, question_text).await;
    info!("Drafting answers for {} questions", questions.len());

    let mut answers = BTreeMap::new();
    for (number, question) in (1u32..).zip(&questions) {
        let prompt = build_answer_prompt(question_text, resume, question);
        let reply = client.chat(None, &prompt, ANSWER_OPTIONS).await?;

        if is_refusal(&reply) {
            warn!("Skipping question {number}: model declined to answer");
            continue;
        }
        answers.insert(
            number,
            DraftAnswer {
                question: question.clone(),
                answer: reply,
            },
        );
    }

    Ok(DraftSet {
        total_questions: questions.len(),
        answers,
    })
}
