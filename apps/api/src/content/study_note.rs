//! Study-note card rendered as a standalone HTML document.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyNote {
    pub key_concepts: Vec<String>,
    pub summary: String,
    pub questions: Vec<String>,
    pub related_topics: Vec<String>,
}

/// Body of `POST /api/generate-image`: structured notes or free text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NoteContent {
    Structured(StudyNote),
    Text(String),
}

impl NoteContent {
    /// Free text becomes the summary section.
    pub fn into_note(self) -> StudyNote {
        match self {
            NoteContent::Structured(note) => note,
            NoteContent::Text(text) => StudyNote {
                summary: text.trim().to_string(),
                ..StudyNote::default()
            },
        }
    }
}

const NOTE_STYLE: &str = "\
body{font-family:'Noto Sans KR','Malgun Gothic',sans-serif;margin:0;padding:20px;\
background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);min-height:100vh;\
display:flex;justify-content:center;align-items:center}\
.study-note{background:#fff;border-radius:15px;padding:30px;box-shadow:0 10px 30px rgba(0,0,0,.2);\
max-width:800px;width:100%}\
.title{text-align:center;color:#333;font-size:24px;font-weight:bold;margin-bottom:30px;\
border-bottom:3px solid #667eea;padding-bottom:15px}\
.section{margin-bottom:25px;padding:20px;border-radius:10px;border-left:5px solid}\
.section h3{margin:0 0 15px 0;font-size:18px}\
.section p,.section li{margin:5px 0;line-height:1.6;color:#555}\
.concepts{background:#f0f8ff;border-left-color:#4CAF50}\
.summary{background:#fff8e1;border-left-color:#FF9800}\
.questions{background:#f3e5f5;border-left-color:#9C27B0}\
.related{background:#e8f5e8;border-left-color:#2196F3}";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn list_section(class: &str, heading: &str, items: &[String], empty: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let body = if items.is_empty() {
        format!("<p>{}</p>", escape_html(empty))
    } else {
        let lis: String = items
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(item)))
            .collect();
        format!("<ul>{lis}</ul>")
    };
    format!("<div class=\"section {class}\"><h3>{heading}</h3>{body}</div>")
}

fn text_section(class: &str, heading: &str, text: &str, empty: &str) -> String {
    let text = text.trim();
    let paragraphs: String = if text.is_empty() {
        format!("<p>{}</p>", escape_html(empty))
    } else {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| format!("<p>{}</p>", escape_html(l)))
            .collect()
    };
    format!("<div class=\"section {class}\"><h3>{heading}</h3>{paragraphs}</div>")
}

pub fn render_html(note: &StudyNote) -> String {
    let sections = [
        list_section("concepts", "🎯 핵심 개념", &note.key_concepts, "핵심 개념이 없습니다."),
        text_section("summary", "📝 요약 노트", &note.summary, "요약 노트가 없습니다."),
        list_section("questions", "❓ 질문/확인사항", &note.questions, "질문/확인사항이 없습니다."),
        list_section("related", "🔗 관련 주제", &note.related_topics, "관련 주제가 없습니다."),
    ]
    .concat();

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"UTF-8\"><style>{NOTE_STYLE}</style></head>\
<body><div class=\"study-note\"><div class=\"title\">📚 학습 노트</div>{sections}</div></body></html>"
    )
}

pub fn to_html_data_url(html: &str) -> String {
    format!("data:text/html;base64,{}", STANDARD.encode(html.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_fills_summary() {
        let content: NoteContent = serde_json::from_str("\"광합성은 빛 에너지를 쓴다\"").unwrap();
        let note = content.into_note();
        assert_eq!(note.summary, "광합성은 빛 에너지를 쓴다");
        assert!(note.key_concepts.is_empty());
    }

    #[test]
    fn test_structured_content_parses_partial_object() {
        let content: NoteContent =
            serde_json::from_str(r#"{"key_concepts": ["ATP"], "summary": "Energy"}"#).unwrap();
        let note = content.into_note();
        assert_eq!(note.key_concepts, vec!["ATP".to_string()]);
        assert!(note.questions.is_empty());
    }

    #[test]
    fn test_render_escapes_markup() {
        let note = StudyNote {
            key_concepts: vec!["<script>alert(1)</script>".to_string()],
            summary: "a & b".to_string(),
            ..StudyNote::default()
        };
        let html = render_html(&note);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<p>a &amp; b</p>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_sections_show_placeholder() {
        let html = render_html(&StudyNote::default());
        assert!(html.contains("관련 주제가 없습니다."));
        assert!(html.contains("요약 노트가 없습니다."));
    }

    #[test]
    fn test_data_url_round_trips() {
        let url = to_html_data_url("<p>hi</p>");
        let encoded = url.strip_prefix("data:text/html;base64,").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), b"<p>hi</p>");
    }
}
