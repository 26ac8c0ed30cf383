// Wellbeing chat: Gemini replies tagged with an emotion, plus the quote catalogue.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod history;
pub mod prompts;
pub mod quotes;
