//! Answer scoring: model evaluation first, a rule-based evaluator otherwise.
//!
//! The rule-based score is the sum of four parts:
//! length (max 25), relevance (max 35), time use (max 25) and structure (max 15).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::EVALUATION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RESPOND_IN_KOREAN};
use crate::llm_client::LlmClient;

const MAX_SCORE: u32 = 100;

const POSITIVE_KEYWORDS: [&str; 22] = [
    "경험", "프로젝트", "팀", "협업", "문제해결", "학습", "성장", "도전", "성과", "개선", "혁신",
    "창의", "리더십", "소통", "책임", "열정", "goal", "achieve", "success", "team", "project",
    "experience",
];

const CONNECTIVES: [&str; 7] = [
    "그래서", "따라서", "또한", "하지만", "그러나", "예를 들어", "결과적으로",
];

const EXAMPLE_MARKERS: [&str; 6] = ["경험", "프로젝트", "사례", "예시", "때", "상황"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub score: u32,
    pub feedback: String,
}

fn default_model_score() -> f64 {
    75.0
}

fn default_model_feedback() -> String {
    "좋은 답변이었습니다.".to_string()
}

#[derive(Debug, Deserialize)]
struct ModelEvaluation {
    #[serde(default = "default_model_score")]
    score: f64,
    #[serde(default = "default_model_feedback")]
    feedback: String,
}

impl From<ModelEvaluation> for Evaluation {
    fn from(e: ModelEvaluation) -> Self {
        Evaluation {
            score: e.score.round().clamp(0.0, MAX_SCORE as f64) as u32,
            feedback: e.feedback,
        }
    }
}

/// Scores an answer with the model, falling back to [`rule_based_evaluation`] on any failure.
pub async fn evaluate_answer(
    llm: Option<&LlmClient>,
    question: &str,
    answer: &str,
    time_taken: u32,
    max_time: u32,
) -> Evaluation {
    if let Some(llm) = llm {
        let prompt = EVALUATION_PROMPT_TEMPLATE
            .replace("{question}", question)
            .replace("{answer}", answer)
            .replace("{time_taken}", &time_taken.to_string())
            .replace("{max_time}", &max_time.to_string())
            .replace("{language}", RESPOND_IN_KOREAN);

        match llm.call_json::<ModelEvaluation>(&prompt, JSON_ONLY_SYSTEM).await {
            Ok(evaluation) => return evaluation.into(),
            Err(e) => warn!("Model evaluation failed, using rule-based scoring: {e}"),
        }
    }

    rule_based_evaluation(question, answer, time_taken, max_time)
}

pub fn rule_based_evaluation(
    question: &str,
    answer: &str,
    time_taken: u32,
    max_time: u32,
) -> Evaluation {
    let mut feedback = Vec::new();

    let length = answer.trim().chars().count();
    let length_score = match length {
        0..=19 => {
            feedback.push("답변이 너무 짧습니다. 더 구체적으로 설명해주세요.");
            10
        }
        20..=99 => {
            feedback.push("답변을 좀 더 자세히 설명해주시면 좋겠습니다.");
            15
        }
        100..=299 => {
            feedback.push("적절한 길이의 답변입니다.");
            25
        }
        _ => {
            feedback.push("답변이 상세하지만 핵심을 간결하게 정리하는 연습이 필요합니다.");
            20
        }
    };

    let relevance = relevance_score(question, answer);
    feedback.push(if relevance >= 30 {
        "질문과 관련된 내용으로 잘 답변하셨습니다."
    } else if relevance >= 20 {
        "질문과 어느 정도 관련된 답변이지만 더 구체적이면 좋겠습니다."
    } else {
        "질문의 핵심을 파악하여 더 관련성 있는 답변을 해주세요."
    });

    let ratio = time_ratio(time_taken, max_time);
    let time = time_score(ratio);
    feedback.push(if ratio > 1.0 {
        "시간 관리에 주의해주세요."
    } else if ratio < 0.3 {
        "시간을 충분히 활용해서 더 자세한 설명을 해주세요."
    } else {
        "시간 관리가 적절합니다."
    });

    let structure = structure_score(answer);
    feedback.push(if structure >= 12 {
        "답변이 논리적으로 잘 구성되어 있습니다."
    } else {
        "답변을 더 체계적으로 구성해보세요."
    });

    Evaluation {
        score: (length_score + relevance + time + structure).min(MAX_SCORE),
        feedback: feedback.join(" "),
    }
}

/// Shared words with the question (max 20) plus interview keywords (max 15).
fn relevance_score(question: &str, answer: &str) -> u32 {
    let question = question.to_lowercase();
    let answer = answer.to_lowercase();

    let question_words: HashSet<&str> = question.split_whitespace().collect();
    let answer_words: HashSet<&str> = answer.split_whitespace().collect();
    let shared = question_words.intersection(&answer_words).count() as u32;

    let positive = POSITIVE_KEYWORDS
        .iter()
        .filter(|k| answer.contains(*k))
        .count() as u32;

    (shared * 3).min(20) + (positive * 2).min(15)
}

fn time_ratio(time_taken: u32, max_time: u32) -> f64 {
    if max_time == 0 {
        1.0
    } else {
        time_taken as f64 / max_time as f64
    }
}

fn time_score(ratio: f64) -> u32 {
    if ratio > 1.2 {
        5
    } else if ratio > 1.0 {
        15
    } else if ratio >= 0.7 {
        25
    } else if ratio >= 0.3 {
        20
    } else {
        10
    }
}

fn structure_score(answer: &str) -> u32 {
    let sentences = answer.split('.').filter(|s| !s.trim().is_empty()).count();
    let mut score = 0;
    if sentences >= 3 {
        score += 5;
    }
    if CONNECTIVES.iter().any(|c| answer.contains(c)) {
        score += 5;
    }
    if EXAMPLE_MARKERS.iter().any(|m| answer.contains(m)) {
        score += 5;
    }
    score
}
