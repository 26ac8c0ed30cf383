//! Job posting analysis: crawl a posting URL and extract structured job info.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::crawl;
use crate::interview::prompts::JOB_POSTING_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RESPOND_IN_KOREAN};
use crate::llm_client::LlmClient;

const POSTING_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Pages with less text than this are not worth sending to the model.
const MIN_POSTING_CHARS: usize = 100;
const POSTING_PROMPT_CHARS: usize = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub preferred: String,
    #[serde(default)]
    pub full_text: String,
}

impl Default for JobInfo {
    fn default() -> Self {
        Self {
            company: "미확인 회사".to_string(),
            position: "일반 직무".to_string(),
            responsibilities: "업무 수행 및 팀 협업".to_string(),
            requirements: "관련 경험 및 기술".to_string(),
            preferred: "관련 자격증 및 우대사항".to_string(),
            full_text: "기본 채용 정보".to_string(),
        }
    }
}

/// Manually entered posting fields; blanks fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFields {
    pub company: Option<String>,
    pub position: Option<String>,
    pub responsibilities: Option<String>,
    pub requirements: Option<String>,
}

fn or_default(value: Option<String>, default: String) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

impl JobInfo {
    pub fn from_fields(fields: JobFields) -> Self {
        let defaults = JobInfo::default();
        let company = or_default(fields.company, defaults.company);
        let position = or_default(fields.position, defaults.position);
        let full_text = format!("회사: {company}, 직무: {position}");
        Self {
            responsibilities: or_default(fields.responsibilities, defaults.responsibilities),
            requirements: or_default(fields.requirements, defaults.requirements),
            preferred: defaults.preferred,
            company,
            position,
            full_text,
        }
    }

    /// Fills blanks left by the model with defaults.
    fn completed(self) -> Self {
        let defaults = JobInfo::default();
        let full_text = format!("분석된 채용공고: {} {}", self.company, self.position)
            .trim()
            .to_string();
        Self {
            company: or_default(Some(self.company), defaults.company),
            position: or_default(Some(self.position), defaults.position),
            responsibilities: or_default(Some(self.responsibilities), defaults.responsibilities),
            requirements: or_default(Some(self.requirements), defaults.requirements),
            preferred: or_default(Some(self.preferred), defaults.preferred),
            full_text,
        }
    }
}

/// Crawls a posting and extracts job info. Never fails: every error yields the default.
pub async fn analyze_posting(llm: Option<&LlmClient>, url: &str) -> JobInfo {
    let page = match crawl::fetch_page(url, POSTING_FETCH_TIMEOUT).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Could not crawl job posting {url}: {e}");
            return JobInfo::default();
        }
    };
    info!("Crawled job posting {url}: {} chars of text", page.text.chars().count());

    let Some(llm) = llm else {
        return JobInfo::default();
    };
    if page.text.chars().count() <= MIN_POSTING_CHARS {
        return JobInfo::default();
    }

    let excerpt: String = page.text.chars().take(POSTING_PROMPT_CHARS).collect();
    let prompt = JOB_POSTING_PROMPT_TEMPLATE
        .replace("{language}", RESPOND_IN_KOREAN)
        .replace("{posting_text}", &excerpt);

    match llm.call_json::<JobInfo>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(job) => {
            info!("Extracted job posting: {} / {}", job.company, job.position);
            job.completed()
        }
        Err(e) => {
            warn!("Job posting extraction failed: {e}");
            JobInfo::default()
        }
    }
}
