// All LLM prompt constants for the content analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for every content analysis call.
pub const ANALYST_SYSTEM: &str = "You are a professional content analyst. \
    Analyse the material you are given accurately and return structured results. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Text analysis prompt. Replace `{perspective}`, `{extra_field}`, `{language}` and `{text}`.
pub const TEXT_ANALYSIS_TEMPLATE: &str = r#"Analyse the following text from a {perspective} perspective.

Return a JSON object with this EXACT schema:
{
  "classification": "short category label",
  "main_content": "summary of the main content",
  "key_points": ["point 1", "point 2", "point 3"],
  "sentiment": "positive | negative | neutral",
  "recommendations": ["recommendation 1", "recommendation 2"]{extra_field}
}

{language}

TEXT:
{text}"#;

pub const BUSINESS_FIELD: &str =
    ",\n  \"business_info\": \"business-relevant facts: company, market, strategy\"";
pub const STUDY_FIELD: &str =
    ",\n  \"study_notes\": \"the material reorganised as concise study notes\"";
pub const NEWS_FIELD: &str =
    ",\n  \"impact_analysis\": \"who is affected by this news and how\"";

/// Vision prompt for image summaries. Replace `{language}`.
pub const IMAGE_SUMMARY_TEMPLATE: &str = r#"Analyse this image and read all of the text in it.

Return a JSON object with this EXACT schema:
{
  "classification": "one of: study material, news article, document, work material, personal note, other",
  "main_content": "detailed summary that includes the text found in the image",
  "is_study_content": true,
  "study_notes": {
    "key_concepts": ["important concepts, terms, people or events"],
    "summary": "the content organised so it is easy to review",
    "questions": ["questions worth checking further"],
    "related_topics": ["related subjects or background knowledge"]
  }
}

Set "is_study_content" to false and "study_notes" to null unless the image is study material.
When it is study material, fill every study_notes field with real content.
{language}"#;

/// Link analysis prompt. Replace `{perspective}`, `{url}`, `{title}`, `{description}`,
/// `{body}` and `{language}`.
pub const LINK_ANALYSIS_TEMPLATE: &str = r#"Analyse the following web page from a {perspective} perspective.

URL: {url}
TITLE: {title}
DESCRIPTION: {description}
BODY:
{body}

Return a JSON object with this EXACT schema:
{
  "title": "page title",
  "description": "one-paragraph description of the page",
  "company_info": "company information, if any",
  "key_insights": ["insight 1", "insight 2"],
  "market_analysis": "market analysis, if relevant",
  "recommendations": ["recommendation 1", "recommendation 2"]
}

{language}"#;
