//! AI-backed analysis of text, images and web links.
//!
//! Each analyser asks the model for a fixed JSON shape and degrades to a
//! usable result when the reply is not valid JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::prompts::{
    ANALYST_SYSTEM, BUSINESS_FIELD, IMAGE_SUMMARY_TEMPLATE, LINK_ANALYSIS_TEMPLATE, NEWS_FIELD,
    STUDY_FIELD, TEXT_ANALYSIS_TEMPLATE,
};
use crate::content::study_note::StudyNote;
use crate::crawl::{self, CrawlError};
use crate::llm_client::openai::ChatOptions;
use crate::llm_client::prompts::RESPOND_IN_KOREAN;
use crate::llm_client::{parse_json_reply, LlmError, OpenAiClient};

const ANALYSIS_OPTIONS: ChatOptions = ChatOptions::new(4000, 0.7);
const LINK_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const LINK_BODY_CHARS: usize = 2000;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AnalysisType {
    #[default]
    General,
    Business,
    Study,
    News,
}

impl From<String> for AnalysisType {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "business" => AnalysisType::Business,
            "study" => AnalysisType::Study,
            "news" => AnalysisType::News,
            _ => AnalysisType::General,
        }
    }
}

impl AnalysisType {
    fn perspective(self) -> &'static str {
        match self {
            AnalysisType::General => "general",
            AnalysisType::Business => "business",
            AnalysisType::Study => "learning",
            AnalysisType::News => "news",
        }
    }

    fn extra_field(self) -> &'static str {
        match self {
            AnalysisType::General => "",
            AnalysisType::Business => BUSINESS_FIELD,
            AnalysisType::Study => STUDY_FIELD,
            AnalysisType::News => NEWS_FIELD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub main_content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_analysis: Option<String>,
}

impl TextAnalysis {
    /// Wraps a free-text reply that could not be parsed.
    fn from_raw(raw: &str) -> Self {
        Self {
            classification: "general text".to_string(),
            main_content: raw.trim().to_string(),
            key_points: Vec::new(),
            sentiment: "neutral".to_string(),
            recommendations: Vec::new(),
            business_info: None,
            study_notes: None,
            impact_analysis: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub main_content: String,
    #[serde(default)]
    pub is_study_content: bool,
    #[serde(default)]
    pub study_notes: Option<StudyNote>,
}

impl ImageSummary {
    pub fn unreadable() -> Self {
        Self {
            classification: "image text".to_string(),
            main_content: "Sorry, the text in this image could not be read. The resolution may \
                be too low or the text too small."
                .to_string(),
            is_study_content: false,
            study_notes: None,
        }
    }

    fn normalized(mut self) -> Self {
        if !self.is_study_content {
            self.study_notes = None;
        }
        if self.classification.trim().is_empty() {
            self.classification = "image text".to_string();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAnalysis {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_info: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub market_analysis: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl LinkAnalysis {
    fn from_page(page: &crawl::PageContent) -> Self {
        Self {
            title: page.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            description: page.description.clone().unwrap_or_default(),
            company_info: String::new(),
            key_insights: Vec::new(),
            market_analysis: String::new(),
            recommendations: Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Accepts a `data:` URL or bare base64 and returns a `data:` URL for the vision API.
pub fn as_image_data_url(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:image/jpeg;base64,{image}")
    }
}

fn parse_text_analysis(raw: &str) -> TextAnalysis {
    parse_json_reply::<TextAnalysis>(raw).unwrap_or_else(|e| {
        debug!("Text analysis reply was not JSON ({e}); using raw text");
        TextAnalysis::from_raw(raw)
    })
}

fn parse_link_analysis(raw: &str, page: &crawl::PageContent) -> LinkAnalysis {
    parse_json_reply::<LinkAnalysis>(raw).unwrap_or_else(|e| {
        debug!("Link analysis reply was not JSON ({e}); using page metadata");
        LinkAnalysis::from_page(page)
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Analysers
// ────────────────────────────────────────────────────────────────────────────

pub async fn analyze_text(
    client: &OpenAiClient,
    text: &str,
    kind: AnalysisType,
) -> Result<TextAnalysis, LlmError> {
    let prompt = TEXT_ANALYSIS_TEMPLATE
        .replace("{perspective}", kind.perspective())
        .replace("{extra_field}", kind.extra_field())
        .replace("{language}", RESPOND_IN_KOREAN)
        .replace("{text}", text);

    let raw = client
        .chat(Some(ANALYST_SYSTEM), &prompt, ANALYSIS_OPTIONS)
        .await?;
    Ok(parse_text_analysis(&raw))
}

/// Vision summary of an image. Any failure yields [`ImageSummary::unreadable`].
pub async fn summarize_image(client: &OpenAiClient, image: &str) -> ImageSummary {
    let prompt = IMAGE_SUMMARY_TEMPLATE.replace("{language}", RESPOND_IN_KOREAN);
    let data_url = as_image_data_url(image);

    let raw = match client.vision(&prompt, &data_url, ANALYSIS_OPTIONS).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Image summary failed: {e}");
            return ImageSummary::unreadable();
        }
    };

    match parse_json_reply::<ImageSummary>(&raw) {
        Ok(summary) if !summary.main_content.trim().is_empty() => summary.normalized(),
        Ok(_) => ImageSummary::unreadable(),
        Err(e) => {
            warn!("Image summary reply was not JSON: {e}");
            ImageSummary {
                classification: "image text".to_string(),
                main_content: crawl::truncate_chars(raw.trim(), 300),
                is_study_content: false,
                study_notes: None,
            }
        }
    }
}

pub async fn analyze_link(
    client: &OpenAiClient,
    url: &str,
    kind: AnalysisType,
) -> Result<LinkAnalysis, LinkAnalysisError> {
    let page = crawl::fetch_page(url, LINK_FETCH_TIMEOUT).await?;
    let body = if page.text.is_empty() {
        "(no body text could be extracted)".to_string()
    } else {
        crawl::truncate_chars(&page.text, LINK_BODY_CHARS)
    };

    let perspective = match kind {
        AnalysisType::Business => "business",
        _ => "general",
    };
    let prompt = LINK_ANALYSIS_TEMPLATE
        .replace("{perspective}", perspective)
        .replace("{url}", &page.url)
        .replace("{title}", page.title.as_deref().unwrap_or("Untitled"))
        .replace("{description}", page.description.as_deref().unwrap_or(""))
        .replace("{language}", RESPOND_IN_KOREAN)
        .replace("{body}", &body);

    let raw = client
        .chat(Some(ANALYST_SYSTEM), &prompt, ANALYSIS_OPTIONS)
        .await?;
    Ok(parse_link_analysis(&raw, &page))
}

#[derive(Debug, thiserror::Error)]
pub enum LinkAnalysisError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_unknown_is_general() {
        let kind: AnalysisType = serde_json::from_str("\"Business\"").unwrap();
        assert_eq!(kind, AnalysisType::Business);
        let kind: AnalysisType = serde_json::from_str("\"poetry\"").unwrap();
        assert_eq!(kind, AnalysisType::General);
    }

    #[test]
    fn test_text_analysis_parses_json_with_extra_field() {
        let raw = r#"{"classification": "technology", "main_content": "A launch",
            "key_points": ["a"], "sentiment": "positive", "recommendations": [],
            "impact_analysis": "Large"}"#;
        let analysis = parse_text_analysis(raw);
        assert_eq!(analysis.classification, "technology");
        assert_eq!(analysis.impact_analysis.as_deref(), Some("Large"));
        assert_eq!(analysis.business_info, None);
    }

    #[test]
    fn test_text_analysis_falls_back_to_raw_reply() {
        let analysis = parse_text_analysis("This text is about cooking.");
        assert_eq!(analysis.classification, "general text");
        assert_eq!(analysis.main_content, "This text is about cooking.");
        assert_eq!(analysis.sentiment, "neutral");
        assert!(analysis.key_points.is_empty());

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("study_notes").is_none());
    }

    #[test]
    fn test_link_analysis_falls_back_to_page_metadata() {
        let page = crawl::PageContent {
            url: "https://acme.test".to_string(),
            title: Some("Acme".to_string()),
            description: Some("Rockets".to_string()),
            text: String::new(),
        };
        let analysis = parse_link_analysis("not json", &page);
        assert_eq!(analysis.title, "Acme");
        assert_eq!(analysis.description, "Rockets");
        assert!(analysis.key_insights.is_empty());
    }

    #[test]
    fn test_image_summary_drops_notes_for_non_study_content() {
        let summary: ImageSummary = serde_json::from_str(
            r#"{"classification": "", "main_content": "A receipt", "is_study_content": false,
                "study_notes": {"summary": "ignored"}}"#,
        )
        .unwrap();
        let summary = summary.normalized();
        assert!(summary.study_notes.is_none());
        assert_eq!(summary.classification, "image text");
    }

    #[test]
    fn test_as_image_data_url() {
        assert_eq!(as_image_data_url("QUJD"), "data:image/jpeg;base64,QUJD");
        assert_eq!(
            as_image_data_url("data:image/png;base64,QUJD"),
            "data:image/png;base64,QUJD"
        );
    }
}
