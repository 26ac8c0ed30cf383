// Content tools: local text previews, AI analysis of text / images / links,
// and HTML study-note cards. All LLM calls go through llm_client.

pub mod analysis;
pub mod handlers;
pub mod prompts;
pub mod study_note;
pub mod summarize;
