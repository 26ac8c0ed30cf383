// Mock interview: job posting analysis, question generation and selection,
// in-memory sessions, answer evaluation and PDF result reports.
// Model calls go through llm_client; every model step has a rule-based fallback.

pub mod evaluation;
pub mod handlers;
pub mod jobs;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod selection;
pub mod session;
