// All LLM prompt constants for the mock-interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for plain-text interview tasks (question lists).
pub const INTERVIEWER_SYSTEM: &str = "You are an experienced hiring manager preparing \
    realistic mock interviews for job seekers.";

/// Job posting extraction prompt. Replace `{language}` and `{posting_text}` before sending.
pub const JOB_POSTING_PROMPT_TEMPLATE: &str = r#"The text below was extracted from a job posting web page.
Extract the posting details and ignore menus, adverts and unrelated page content.
If a field is not stated explicitly, infer it from the surrounding content.

Return a JSON object with this EXACT schema:
{
  "company": "company name",
  "position": "job title",
  "responsibilities": "main duties",
  "requirements": "mandatory qualifications",
  "preferred": "preferred qualifications"
}

{language}

POSTING TEXT:
{posting_text}"#;

/// Question generation prompt. Replace `{company}`, `{position}`, `{responsibilities}`,
/// `{requirements}` and `{language}`.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Write 40 mock interview questions for the job below.

Company: {company}
Position: {position}
Responsibilities: {responsibilities}
Requirements: {requirements}

Order them by difficulty:
- Questions 1-15: basic (background, motivation, core knowledge)
- Questions 16-30: intermediate (practical skills, problem solving)
- Questions 31-40: advanced (deep expertise, leadership, strategy)

Write exactly one question per line, numbered like "1. Please introduce yourself."
Do not add headings or any other text.
{language}"#;

/// Answer evaluation prompt. Replace `{question}`, `{answer}`, `{time_taken}`,
/// `{max_time}` and `{language}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this mock interview answer.

Question: {question}
Answer: {answer}
Time used: {time_taken}s of {max_time}s

Score it out of 100 using these weights:
1. Relevance to the question (40)
2. Logical structure (30)
3. Time management (20)
4. Delivery and expression (10)

Return a JSON object with this EXACT schema:
{"score": 0, "feedback": "specific feedback and how to improve"}

{language}"#;
