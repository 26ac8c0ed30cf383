//! Web page fetching and HTML → plain-text extraction shared by link analysis
//! and job-posting analysis.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::USER_AGENT;
use thiserror::Error;
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Elements whose whole content is dropped before text extraction.
const NOISE_TAGS: [&str; 6] = ["script", "style", "nav", "header", "footer", "aside"];

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page returned status {0}")]
    Status(u16),
}

/// A fetched page reduced to what the analysers need.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub text: String,
}

pub async fn fetch_page(url: &str, timeout: Duration) -> Result<PageContent, CrawlError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CrawlError::InvalidUrl(url.to_string()));
    }

    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status(status.as_u16()));
    }

    let html = response.text().await?;
    debug!("Fetched {url}: {} bytes of HTML", html.len());
    Ok(parse_page(url, &html))
}

pub fn parse_page(url: &str, html: &str) -> PageContent {
    PageContent {
        url: url.to_string(),
        title: extract_title(html),
        description: extract_meta_description(html),
        text: html_to_text(html),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTML helpers
// ────────────────────────────────────────────────────────────────────────────

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static regex is valid"))
}

fn noise_patterns() -> &'static [Regex] {
    static CELL: OnceLock<Vec<Regex>> = OnceLock::new();
    CELL.get_or_init(|| {
        NOISE_TAGS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                    .expect("static regex is valid")
            })
            .collect()
    })
}

/// Strips markup and boilerplate sections and collapses whitespace.
pub fn html_to_text(html: &str) -> String {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();

    let mut text = cached(&COMMENT, r"(?s)<!--.*?-->")
        .replace_all(html, " ")
        .into_owned();
    for pattern in noise_patterns() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    let text = cached(&TAG, r"(?s)<[^>]*>").replace_all(&text, " ");
    collapse_whitespace(&decode_entities(&text))
}

pub fn extract_title(html: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    cached(&TITLE, r"(?is)<title[^>]*>(.*?)</title\s*>")
        .captures(html)
        .map(|c| collapse_whitespace(&decode_entities(&c[1])))
        .filter(|t| !t.is_empty())
}

/// Content of `<meta name="description">`, in either attribute order.
pub fn extract_meta_description(html: &str) -> Option<String> {
    static META: OnceLock<Regex> = OnceLock::new();
    static NAME: OnceLock<Regex> = OnceLock::new();
    static CONTENT: OnceLock<Regex> = OnceLock::new();

    cached(&META, r"(?is)<meta\b[^>]*>")
        .find_iter(html)
        .map(|m| m.as_str())
        .find(|tag| cached(&NAME, r#"(?i)\bname\s*=\s*["']description["']"#).is_match(tag))
        .and_then(|tag| {
            cached(&CONTENT, r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .captures(tag)
                .and_then(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| collapse_whitespace(&decode_entities(m.as_str())))
        })
        .filter(|d| !d.is_empty())
}

pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters, with `...` appended when something was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
