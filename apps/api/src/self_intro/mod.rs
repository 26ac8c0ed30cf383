// Self-introduction (cover letter) drafting: extracts the applicant's résumé
// text, works out which questions the employer asks, and drafts one answer
// per question with the OpenAI chat model.

pub mod extract;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod questions;
