// All LLM prompt constants for self-introduction drafting.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Vision prompt for pulling questions out of a photographed or scanned form.
pub const IMAGE_QUESTIONS_PROMPT: &str = r#"Extract the self-introduction (cover letter) questions shown in this image exactly as written.
List them one per line, numbered like "1. question text".
Do not add questions that are not in the image and do not add any other text."#;

/// Question extraction prompt. Replace `{text}` and `{language}`.
pub const QUESTION_EXTRACTION_TEMPLATE: &str = r#"The text below was extracted from a self-introduction form.
Symbols such as ■ or numbers may separate the questions.

TEXT:
---
{text}
---

Rules:
1. Only extract questions that actually appear in the text above.
2. Turn the text after a ■ symbol or a number into a question, e.g. "■ 성장과정" becomes "성장과정에 대해 설명해주세요".
3. Never invent questions that are not in the text.
4. If there are no clear questions, return an empty array.

Return a JSON object with this EXACT schema:
{"questions": ["question found in the text"]}

{language}"#;

/// Answer drafting prompt. Replace `{all_questions}`, `{resume}` and `{question}`.
pub const ANSWER_TEMPLATE: &str = r#"You are a self-introduction consultant. Analyse the applicant's résumé below and draft an answer to one specific question.

[All questions and hiring information]:
---
{all_questions}
---

[Résumé]:
---
{resume}
---

[Question to answer]:
{question}

[Guide]:
1. Look for the ideal candidate profile, preferred qualifications, core competencies and company values in the hiring information and reflect them.
2. Build the answer on the experiences and strengths in the résumé that are most relevant to this question.
3. Connect the applicant's experience to what the company is looking for.
4. Answer only this one question.
5. Do not just summarise the résumé; reshape the story around the intent of the question.
6. Keep sentences short and clear.
7. Use this format:
   **[question]**

   (answer)

Write the answer in natural, polite Korean."#;
