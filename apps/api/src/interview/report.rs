//! Mock-interview result report: assembles the report text and writes it as a PDF.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::pdf::{self, Block, PdfError};

/// Assumed minutes spent per answered question.
const MINUTES_PER_ANSWER: usize = 3;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportInput {
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub scores: Vec<f64>,
    #[serde(default)]
    pub feedback: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Report text
// ────────────────────────────────────────────────────────────────────────────

/// Mean score rounded to one decimal, or 0 without scores.
pub fn average_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Formats a score without a trailing `.0`.
fn fmt_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score:.1}")
    }
}

pub fn score_analysis(scores: &[f64]) -> String {
    if scores.is_empty() {
        return "점수 데이터가 없습니다.".to_string();
    }
    let avg = average_score(scores);
    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    let min = scores.iter().copied().fold(f64::MAX, f64::min);

    let verdict = if avg >= 80.0 {
        "전반적으로 우수한 답변을 보여주셨습니다."
    } else if avg >= 60.0 {
        "보통 수준의 답변이지만 더 발전할 여지가 있습니다."
    } else {
        "답변 준비와 연습이 더 필요합니다."
    };

    format!(
        "평균 점수는 {}점입니다. {verdict} 최고 점수는 {}점, 최저 점수는 {}점입니다.",
        fmt_score(avg),
        fmt_score(max),
        fmt_score(min)
    )
}

pub fn overall_evaluation(scores: &[f64]) -> String {
    if scores.is_empty() {
        return "평가 데이터가 없습니다.".to_string();
    }
    let avg = average_score(scores);
    let text = if avg >= 85.0 {
        "매우 우수한 면접 수행을 보여주셨습니다. 자신감을 가지고 실제 면접에 임하시기 바랍니다."
    } else if avg >= 70.0 {
        "양호한 면접 수행이었습니다. 몇 가지 부분만 보완하면 더 좋은 결과를 얻을 수 있을 것입니다."
    } else if avg >= 55.0 {
        "기본적인 면접 수행은 되었지만, 답변의 구체성과 논리성을 더 높여야 합니다."
    } else {
        "면접 준비가 더 필요합니다. 예상 질문에 대한 답변을 미리 준비하고 연습하시기 바랍니다."
    };
    text.to_string()
}

/// Bulleted suggestions, one per line.
pub fn improvement_suggestions(scores: &[f64], feedback: &[String]) -> String {
    if scores.is_empty() {
        return "개선 방안을 제시할 데이터가 없습니다.".to_string();
    }

    let mut suggestions = Vec::new();
    if average_score(scores) < 70.0 {
        suggestions.push("• 예상 질문에 대한 답변을 미리 준비하고 연습하세요.");
        suggestions.push("• STAR 기법(Situation, Task, Action, Result)을 활용해 답변을 구조화하세요.");
    }
    if scores.iter().any(|s| *s < 60.0) {
        suggestions.push("• 답변 시 구체적인 경험과 사례를 포함하세요.");
        suggestions.push("• 시간 내에 답변을 완료할 수 있도록 연습하세요.");
    }

    let feedback = feedback.join(" ");
    if feedback.contains("시간") {
        suggestions.push("• 시간 관리에 더 신경 쓰세요.");
    }
    if feedback.contains("구체적") {
        suggestions.push("• 더 구체적이고 상세한 답변을 준비하세요.");
    }

    if suggestions.is_empty() {
        suggestions.push("• 현재 수준을 유지하되, 답변의 일관성을 더 높이세요.");
    }
    suggestions.join("\n")
}

/// Lays out the whole report. Only answered questions get a detail section.
pub fn report_blocks(input: &ReportInput, generated_at: DateTime<Local>) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("모의면접 결과 리포트".to_string()),
        Block::Spacer(20),
        Block::Heading("면접 정보".to_string()),
        Block::Table(vec![
            (
                "면접 날짜".to_string(),
                generated_at.format("%Y년 %m월 %d일").to_string(),
            ),
            ("총 질문 수".to_string(), input.questions.len().to_string()),
            (
                "평균 점수".to_string(),
                format!("{}점", fmt_score(average_score(&input.scores))),
            ),
            (
                "총 소요 시간".to_string(),
                format!("{}분", input.answers.len() * MINUTES_PER_ANSWER),
            ),
        ]),
        Block::Spacer(20),
        Block::Heading("점수 분석".to_string()),
    ];
    if !input.scores.is_empty() {
        blocks.push(Block::Paragraph(score_analysis(&input.scores)));
    }
    blocks.push(Block::Spacer(20));

    blocks.push(Block::Heading("질문별 상세 결과".to_string()));
    for (i, (question, answer)) in input.questions.iter().zip(&input.answers).enumerate() {
        blocks.push(Block::Heading(format!("질문 {}", i + 1)));
        blocks.push(Block::Paragraph(format!("Q: {question}")));
        blocks.push(Block::Paragraph(format!("A: {answer}")));
        if let Some(score) = input.scores.get(i) {
            blocks.push(Block::Paragraph(format!("점수: {}점", fmt_score(*score))));
        }
        if let Some(feedback) = input.feedback.get(i) {
            blocks.push(Block::Paragraph(format!("피드백: {feedback}")));
        }
        blocks.push(Block::Spacer(15));
    }

    blocks.push(Block::Heading("종합 평가".to_string()));
    blocks.push(Block::Paragraph(overall_evaluation(&input.scores)));
    blocks.push(Block::Spacer(20));
    blocks.push(Block::Heading("개선 방안".to_string()));
    blocks.push(Block::Paragraph(improvement_suggestions(
        &input.scores,
        &input.feedback,
    )));
    blocks
}

/// `interview_report_<timestamp>_<8 hex>.pdf`; the suffix keeps same-second reports apart.
fn report_filename(generated_at: DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "interview_report_{}_{}.pdf",
        generated_at.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}

/// Renders the report and writes it into `dir`. Returns the file name.
pub async fn write_report(dir: &Path, input: &ReportInput) -> Result<String, ReportError> {
    let generated_at = Local::now();
    let blocks = report_blocks(input, generated_at);
    let bytes = tokio::task::spawn_blocking(move || pdf::render(&blocks))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))??;

    tokio::fs::create_dir_all(dir).await?;
    let filename = report_filename(generated_at);
    tokio::fs::write(dir.join(&filename), &bytes).await?;

    info!("Interview report written: {filename} ({} bytes)", bytes.len());
    Ok(filename)
}

/// Resolves a requested report name inside `dir`, rejecting anything that is not
/// a bare `.pdf` file name.
pub fn report_path(dir: &Path, filename: &str) -> Option<PathBuf> {
    let bare = !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
        && filename.ends_with(".pdf");
    bare.then(|| dir.join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ReportInput {
        ReportInput {
            questions: vec!["자기소개를 해주세요.".to_string(), "강점은?".to_string()],
            answers: vec!["저는 개발자입니다.".to_string()],
            scores: vec![72.0, 55.0],
            feedback: vec!["시간 관리에 주의해주세요.".to_string()],
        }
    }

    #[test]
    fn test_average_score_rounds_to_one_decimal() {
        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[70.0, 75.0, 80.0]), 75.0);
        assert_eq!(average_score(&[70.0, 71.0, 71.0]), 70.7);
    }

    #[test]
    fn test_score_analysis_bands() {
        let text = score_analysis(&[90.0, 80.0]);
        assert!(text.starts_with("평균 점수는 85점입니다."));
        assert!(text.contains("우수한"));
        assert!(text.contains("최고 점수는 90점, 최저 점수는 80점"));
        assert!(score_analysis(&[50.0]).contains("연습이 더 필요합니다"));
        assert_eq!(score_analysis(&[]), "점수 데이터가 없습니다.");
    }

    #[test]
    fn test_overall_evaluation_bands() {
        assert!(overall_evaluation(&[90.0]).starts_with("매우 우수한"));
        assert!(overall_evaluation(&[70.0]).starts_with("양호한"));
        assert!(overall_evaluation(&[55.0]).starts_with("기본적인"));
        assert!(overall_evaluation(&[10.0]).starts_with("면접 준비가"));
    }

    #[test]
    fn test_improvement_suggestions() {
        let text = improvement_suggestions(&[95.0], &[]);
        assert_eq!(text, "• 현재 수준을 유지하되, 답변의 일관성을 더 높이세요.");

        let text = improvement_suggestions(
            &[50.0],
            &["더 구체적으로 설명해주세요. 시간 관리에 주의해주세요.".to_string()],
        );
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("STAR"));
    }

    #[test]
    fn test_report_blocks_cover_answered_questions_only() {
        let blocks = report_blocks(&input(), Local::now());
        let details = blocks
            .iter()
            .filter(|b| matches!(b, Block::Heading(h) if h.starts_with("질문 ")))
            .count();
        assert_eq!(details, 1);
        assert!(blocks.contains(&Block::Paragraph("점수: 72점".to_string())));
        assert!(blocks.iter().any(|b| matches!(
            b,
            Block::Table(rows) if rows.contains(&("총 소요 시간".to_string(), "3분".to_string()))
        )));
    }

    #[test]
    fn test_report_path_rejects_traversal() {
        let dir = Path::new("/reports");
        assert_eq!(
            report_path(dir, "interview_report_1.pdf"),
            Some(dir.join("interview_report_1.pdf"))
        );
        assert!(report_path(dir, "../secret.pdf").is_none());
        assert!(report_path(dir, "a/b.pdf").is_none());
        assert!(report_path(dir, "a\\b.pdf").is_none());
        assert!(report_path(dir, "report.txt").is_none());
    }

    #[tokio::test]
    async fn test_write_report_creates_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let filename = write_report(dir.path(), &input()).await.unwrap();
        assert!(filename.starts_with("interview_report_"));
        assert!(filename.ends_with(".pdf"));
        let bytes = std::fs::read(dir.path().join(&filename)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
