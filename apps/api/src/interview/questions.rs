//! Interview question lists: model-generated, with a built-in bank as fallback.
//!
//! Lists are ordered by difficulty: basic first, then intermediate, then advanced.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::interview::jobs::JobInfo;
use crate::interview::prompts::{INTERVIEWER_SYSTEM, QUESTION_PROMPT_TEMPLATE};
use crate::llm_client::prompts::RESPOND_IN_KOREAN;
use crate::llm_client::LlmClient;

pub const MAX_QUESTIONS: usize = 40;
/// A generated list shorter than this is discarded in favour of the bank.
const MIN_GENERATED_QUESTIONS: usize = 20;
const MAX_ROLE_QUESTIONS: usize = 15;
const MIN_QUESTION_CHARS: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Built-in bank
// ────────────────────────────────────────────────────────────────────────────

const BASIC: [&str; 10] = [
    "자기소개를 해주세요.",
    "이 직무에 지원한 이유는 무엇인가요?",
    "본인의 강점과 약점은 무엇인가요?",
    "5년 후 본인의 모습을 어떻게 그리고 있나요?",
    "팀워크 경험에 대해 말씀해주세요.",
    "스트레스를 어떻게 관리하시나요?",
    "실패했던 경험과 그로부터 배운 점은 무엇인가요?",
    "새로운 기술을 학습하는 방법은 무엇인가요?",
    "업무 우선순위를 어떻게 정하시나요?",
    "갈등 상황을 어떻게 해결하시나요?",
];

const INTERMEDIATE: [&str; 10] = [
    "리더십을 발휘했던 경험을 말씀해주세요.",
    "창의적으로 문제를 해결한 경험을 말씀해주세요.",
    "업무에서 가장 중요하게 생각하는 가치는 무엇인가요?",
    "고객 만족을 위해 노력했던 경험이 있나요?",
    "시간 관리는 어떻게 하시나요?",
    "동료와 의견이 다를 때 어떻게 조율하시나요?",
    "업무 개선을 제안한 경험이 있나요?",
    "여러 업무를 동시에 처리해야 할 때 어떻게 하시나요?",
    "피드백을 받을 때 어떻게 대응하시나요?",
    "압박감이 큰 상황에서의 경험을 말씀해주세요.",
];

const ADVANCED: [&str; 10] = [
    "조직의 변화를 이끌어본 경험이 있나요?",
    "전략적 의사결정을 내린 경험을 말씀해주세요.",
    "장기적인 비전을 어떻게 설정하시나요?",
    "혁신적인 아이디어를 실현한 경험이 있나요?",
    "위기 상황을 관리한 경험이 있나요?",
    "다양한 이해관계자를 조율한 경험을 말씀해주세요.",
    "성과를 측정하고 개선한 방법을 말씀해주세요.",
    "업계 트렌드를 어떻게 예측하시나요?",
    "글로벌 관점에서 일한 경험이 있나요?",
    "미래 기술 발전에 대한 견해를 말씀해주세요.",
];

const JAVA_DEVELOPER: [&str; 10] = [
    "Java 개발 경험은 어느 정도 되시나요?",
    "Spring Framework 사용 경험에 대해 말씀해주세요.",
    "전자정부프레임워크 사용 경험이 있으신가요?",
    "DBMS 설계 및 최적화 경험을 말씀해주세요.",
    "웹 애플리케이션 보안은 어떻게 관리하시나요?",
    "RESTful API 설계 시 고려사항은 무엇인가요?",
    "JPA와 MyBatis 중 어떤 것을 선호하시나요?",
    "웹 성능 최적화 경험이 있으신가요?",
    "리눅스 환경에서의 개발 및 배포 경험을 말씀해주세요.",
    "코드 품질은 어떻게 관리하시나요?",
];

const DEVELOPER: [&str; 10] = [
    "가장 자신 있는 프로그래밍 언어는 무엇인가요?",
    "최근에 작업한 프로젝트에 대해 설명해주세요.",
    "코드 리뷰는 어떻게 진행하시나요?",
    "버그를 디버깅하는 본인만의 방법이 있나요?",
    "새로운 기술 트렌드를 어떻게 따라가시나요?",
    "팀 단위 개발 경험이 있으신가요?",
    "데이터베이스 설계 경험이 있나요?",
    "성능 최적화를 위해 노력한 경험을 말씀해주세요.",
    "오픈소스 기여 경험이 있나요?",
    "테스트 코드 작성에 대해 어떻게 생각하시나요?",
];

const DESIGN_PLANNING: [&str; 10] = [
    "본인의 디자인 철학은 무엇인가요?",
    "사용자 경험을 개선한 사례가 있나요?",
    "프로젝트 기획 시 가장 중요하게 생각하는 요소는 무엇인가요?",
    "데이터 기반으로 의사결정을 한 경험이 있나요?",
    "이해관계자들과 협업한 경험을 말씀해주세요.",
    "창의적인 아이디어를 어떻게 발전시키시나요?",
    "트렌드 분석은 어떻게 하시나요?",
    "프로젝트 일정을 관리한 경험을 말씀해주세요.",
    "고객 피드백을 어떻게 반영하시나요?",
    "브랜딩에 대해 어느 정도 이해하고 계신가요?",
];

const MARKETING_SALES: [&str; 10] = [
    "성공적인 마케팅 캠페인 경험이 있나요?",
    "고객과의 관계는 어떻게 구축하시나요?",
    "시장 분석은 어떤 방식으로 진행하시나요?",
    "매출 목표 달성을 위한 전략은 무엇인가요?",
    "디지털 마케팅 경험이 있나요?",
    "고객 불만을 처리한 경험을 말씀해주세요.",
    "경쟁사 분석은 어떻게 하시나요?",
    "브랜드 인지도를 높이기 위한 아이디어가 있나요?",
    "데이터 분석 도구 사용 경험을 말씀해주세요.",
    "교차 판매나 상향 판매 경험이 있나요?",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Extra questions keyed off the position title.
pub fn role_specific_questions(position: &str) -> Vec<String> {
    let lower = position.to_lowercase();
    let set: &[&str] = if contains_any(&lower, &["개발", "엔지니어", "developer", "engineer"]) {
        if contains_any(&lower, &["java", "자바"]) {
            &JAVA_DEVELOPER
        } else {
            &DEVELOPER
        }
    } else if contains_any(&lower, &["디자인", "기획", "design", "planner", "planning"]) {
        &DESIGN_PLANNING
    } else if contains_any(&lower, &["마케팅", "영업", "marketing", "sales"]) {
        &MARKETING_SALES
    } else {
        &[]
    };

    set.iter()
        .take(MAX_ROLE_QUESTIONS)
        .map(|q| q.to_string())
        .collect()
}

/// The bank (10 basic, 10 intermediate, 10 advanced) plus role questions, capped at 40.
pub fn fallback_questions(position: &str) -> Vec<String> {
    BASIC
        .iter()
        .chain(INTERMEDIATE.iter())
        .chain(ADVANCED.iter())
        .map(|q| q.to_string())
        .chain(role_specific_questions(position))
        .take(MAX_QUESTIONS)
        .collect()
}

/// Keeps `N.`-numbered lines whose text is longer than five characters.
pub fn parse_numbered_questions(text: &str) -> Vec<String> {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let numbered =
        NUMBERED.get_or_init(|| Regex::new(r"^\d+\.\s*(.*)$").expect("static regex is valid"));

    text.lines()
        .filter_map(|line| numbered.captures(line.trim()))
        .map(|c| c[1].trim().to_string())
        .filter(|q| q.chars().count() > MIN_QUESTION_CHARS)
        .collect()
}

/// Generates up to 40 questions for the job, falling back to the bank.
pub async fn generate_questions(llm: Option<&LlmClient>, job: &JobInfo) -> Vec<String> {
    if let Some(llm) = llm {
        let prompt = QUESTION_PROMPT_TEMPLATE
            .replace("{company}", &job.company)
            .replace("{position}", &job.position)
            .replace("{responsibilities}", &job.responsibilities)
            .replace("{requirements}", &job.requirements)
            .replace("{language}", RESPOND_IN_KOREAN);

        match llm.call_text(&prompt, INTERVIEWER_SYSTEM).await {
            Ok(text) => {
                let mut questions = parse_numbered_questions(&text);
                if questions.len() >= MIN_GENERATED_QUESTIONS {
                    questions.truncate(MAX_QUESTIONS);
                    info!("Generated {} interview questions", questions.len());
                    return questions;
                }
                warn!(
                    "Model produced only {} usable questions; using the built-in bank",
                    questions.len()
                );
            }
            Err(e) => warn!("Question generation failed: {e}"),
        }
    }

    fallback_questions(&job.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbered_questions_filters_short_and_unnumbered() {
        let text = "Here are your questions:\n\
            1. Please introduce yourself.\n\
            2. Why?\n\
            basic section\n\
            10.   What is your biggest achievement?\n\
            - 11. not numbered at start";
        let questions = parse_numbered_questions(text);
        assert_eq!(
            questions,
            vec![
                "Please introduce yourself.".to_string(),
                "What is your biggest achievement?".to_string()
            ]
        );
    }

    #[test]
    fn test_fallback_without_role_is_bank_of_30() {
        let questions = fallback_questions("관광통역 안내사");
        assert_eq!(questions.len(), 30);
        assert_eq!(questions[0], BASIC[0]);
        assert_eq!(questions[10], INTERMEDIATE[0]);
        assert_eq!(questions[20], ADVANCED[0]);
    }

    #[test]
    fn test_fallback_adds_role_questions_up_to_40() {
        let questions = fallback_questions("Backend 개발자");
        assert_eq!(questions.len(), MAX_QUESTIONS);
        assert_eq!(questions[30], DEVELOPER[0]);
    }

    #[test]
    fn test_java_developer_gets_java_questions() {
        let questions = role_specific_questions("JAVA 웹 개발자");
        assert_eq!(questions[0], JAVA_DEVELOPER[0]);
        let questions = role_specific_questions("Senior Java Engineer");
        assert_eq!(questions[0], JAVA_DEVELOPER[0]);
    }

    #[test]
    fn test_role_matching_for_design_and_sales() {
        assert_eq!(role_specific_questions("서비스 기획자")[0], DESIGN_PLANNING[0]);
        assert_eq!(role_specific_questions("B2B 영업")[0], MARKETING_SALES[0]);
        assert!(role_specific_questions("회계").is_empty());
    }

    #[tokio::test]
    async fn test_generate_without_client_uses_bank() {
        let job = JobInfo::default();
        let questions = generate_questions(None, &job).await;
        assert_eq!(questions, fallback_questions(&job.position));
    }
}
