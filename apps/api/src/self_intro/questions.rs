//! Works out which questions a self-introduction form asks.
//!
//! Order of attempts: an already numbered list, the model, then local pattern matching.
//! Every path yields at least one question.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::openai::{ChatOptions, OpenAiClient};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RESPOND_IN_KOREAN};
use crate::self_intro::prompts::QUESTION_EXTRACTION_TEMPLATE;

const EXTRACTION_OPTIONS: ChatOptions = ChatOptions::new(1000, 0.1);
/// Shorter text cannot hold a real question list.
const MIN_QUESTION_TEXT_CHARS: usize = 20;
const MIN_EXTRACTED_CHARS: usize = 5;
/// Local parsing stops adding pattern matches once it has this many.
const ENOUGH_QUESTIONS: usize = 3;

pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "성장과정에 대해 설명해주세요",
    "지원동기를 말씀해주세요",
    "입사 후 포부를 설명해주세요",
];

const KEYWORD_QUESTIONS: [(&str, &str); 5] = [
    ("성장과정", "성장과정에 대해 설명해주세요"),
    ("지원동기", "지원동기를 말씀해주세요"),
    ("장단점", "성격의 장단점을 설명해주세요"),
    ("포부", "입사 후 포부를 말씀해주세요"),
    ("강점", "본인의 강점을 설명해주세요"),
];

fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static regex is valid"))
}

/// Leaves requests and questions alone; turns a bare topic into a request.
pub fn phrase_as_request(content: &str) -> String {
    let content = content.trim();
    let is_request = ["세요", "까요", "니까", "?"]
        .iter()
        .any(|ending| content.ends_with(ending));
    if is_request {
        content.to_string()
    } else {
        format!("{content}에 대해 설명해주세요")
    }
}

/// Lines starting with `N.`, with the number stripped. Used when the text
/// already looks like a numbered list (contains both `1.` and `2.`).
pub fn numbered_lines(text: &str) -> Option<Vec<String>> {
    if !(text.contains("1.") && text.contains("2.")) {
        return None;
    }
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let numbered = regex(&NUMBERED, r"^\d+\.\s*(.*)$");

    let questions: Vec<String> = text
        .lines()
        .filter_map(|line| numbered.captures(line.trim()))
        .map(|c| c[1].trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    (!questions.is_empty()).then_some(questions)
}

/// True when less than half of a longer text is letters, digits or whitespace,
/// which is what badly recognised scans look like.
fn looks_garbled(text: &str) -> bool {
    let total = text.chars().count();
    if total <= 50 {
        return false;
    }
    let valid = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .count();
    (valid as f64) / (total as f64) < 0.5
}

/// Local pattern matching: `N. topic`, then `■ topic`, then one known keyword,
/// then the default questions.
pub fn keyword_questions(text: &str) -> Vec<String> {
    if looks_garbled(text) {
        return default_questions();
    }

    static NUMBERED_TOPIC: OnceLock<Regex> = OnceLock::new();
    static SQUARE_TOPIC: OnceLock<Regex> = OnceLock::new();
    let numbered_topic = regex(&NUMBERED_TOPIC, r"\d+\.\s*([^0-9\n]{3,50})");
    let square_topic = regex(&SQUARE_TOPIC, r"■\s*([^■\n]{3,50})");

    let mut questions: Vec<String> = numbered_topic
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|topic| topic.chars().count() > 3)
        .map(|topic| phrase_as_request(&topic))
        .collect();

    if questions.len() < ENOUGH_QUESTIONS {
        questions.extend(
            square_topic
                .captures_iter(text)
                .map(|c| c[1].trim().to_string())
                .filter(|topic| !topic.is_empty())
                .map(|topic| phrase_as_request(&topic)),
        );
    }

    if questions.len() < ENOUGH_QUESTIONS {
        if let Some((_, question)) = KEYWORD_QUESTIONS.iter().find(|(k, _)| text.contains(k)) {
            questions.push(question.to_string());
        }
    }

    if questions.is_empty() {
        return default_questions();
    }
    questions
}

#[derive(Debug, Deserialize)]
struct ExtractedQuestions {
    #[serde(default)]
    questions: Vec<String>,
}

/// Finds the questions in `text`. Never fails and never returns an empty list.
pub async fn parse_questions(client: &OpenAiClient, text: &str) -> Vec<String> {
    if let Some(questions) = numbered_lines(text) {
        debug!("Question text is already numbered: {} questions", questions.len());
        return questions;
    }

    if text.trim().chars().count() < MIN_QUESTION_TEXT_CHARS {
        return default_questions();
    }

    let prompt = QUESTION_EXTRACTION_TEMPLATE
        .replace("{text}", text)
        .replace("{language}", RESPOND_IN_KOREAN);

    match client
        .chat_json::<ExtractedQuestions>(Some(JSON_ONLY_SYSTEM), &prompt, EXTRACTION_OPTIONS)
        .await
    {
        Ok(extracted) => {
            let questions: Vec<String> = extracted
                .questions
                .into_iter()
                .map(|q| q.trim().to_string())
                .filter(|q| q.chars().count() > MIN_EXTRACTED_CHARS)
                .collect();
            if !questions.is_empty() {
                return questions;
            }
            debug!("Model found no questions; using pattern matching");
        }
        Err(e) => warn!("Question extraction failed, using pattern matching: {e}"),
    }

    keyword_questions(text)
}
