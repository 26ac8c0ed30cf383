//! Picks the questions for one interview from a difficulty-ordered list.
//!
//! Lists follow the layout produced by `questions`: indices `[0,10)` are basic,
//! `[10,25)` intermediate and `[25,40)` advanced. Shorter lists clamp each slice.

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const BASIC_RANGE: Range<usize> = 0..10;
const INTERMEDIATE_RANGE: Range<usize> = 10..25;
const ADVANCED_RANGE: Range<usize> = 25..40;

/// Requested difficulty. Korean labels are accepted; anything unknown means mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
    #[default]
    Mixed,
}

impl Difficulty {
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "basic" | "기초" => Difficulty::Basic,
            "intermediate" | "중급" => Difficulty::Intermediate,
            "advanced" | "고급" => Difficulty::Advanced,
            _ => Difficulty::Mixed,
        }
    }
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        Difficulty::parse_lenient(&label)
    }
}

/// Level shown for a question, which also sets its time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl QuestionLevel {
    /// Seconds allowed for an answer.
    pub fn time_limit(self) -> u32 {
        match self {
            QuestionLevel::Basic => 120,
            QuestionLevel::Intermediate => 180,
            QuestionLevel::Advanced => 300,
        }
    }

    /// Level for the question at `index` in an interview of `total` questions.
    pub fn for_position(index: usize, total: usize) -> Self {
        if index < total / 3 {
            QuestionLevel::Basic
        } else if index < total * 2 / 3 {
            QuestionLevel::Intermediate
        } else {
            QuestionLevel::Advanced
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub difficulty: QuestionLevel,
    pub time_limit: u32,
    pub question_number: usize,
}

fn clamped(range: Range<usize>, len: usize) -> Range<usize> {
    range.start.min(len)..range.end.min(len)
}

fn sample<R: Rng + ?Sized>(
    questions: &[String],
    range: Range<usize>,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    questions[clamped(range, questions.len())]
        .choose_multiple(rng, count)
        .cloned()
        .collect()
}

/// Selects up to `count` questions at `difficulty` and numbers them from 1.
/// Levels and time limits are assigned by position within `count`.
///
/// If the requested slice is empty the whole list is drawn from instead.
pub fn select_questions<R: Rng + ?Sized>(
    questions: &[String],
    count: usize,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<InterviewQuestion> {
    let mut picked = match difficulty {
        Difficulty::Basic => sample(questions, BASIC_RANGE, count, rng),
        Difficulty::Intermediate => sample(questions, INTERMEDIATE_RANGE, count, rng),
        Difficulty::Advanced => sample(questions, ADVANCED_RANGE, count, rng),
        Difficulty::Mixed => {
            let basic = 3.min(count / 3);
            let intermediate = 5.min(count / 2);
            let advanced = 7.min(count.saturating_sub(basic + intermediate));
            let mut mixed = sample(questions, BASIC_RANGE, basic, rng);
            mixed.extend(sample(questions, INTERMEDIATE_RANGE, intermediate, rng));
            mixed.extend(sample(questions, ADVANCED_RANGE, advanced, rng));
            mixed
        }
    };

    if picked.is_empty() {
        picked = questions.choose_multiple(rng, count).cloned().collect();
    }

    picked.shuffle(rng);
    picked.truncate(count);

    // Levels follow the requested count even when fewer questions were available.
    picked
        .into_iter()
        .enumerate()
        .map(|(i, question)| {
            let level = QuestionLevel::for_position(i, count);
            InterviewQuestion {
                question,
                difficulty: level,
                time_limit: level.time_limit(),
                question_number: i + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("q{i}")).collect()
    }

    fn index_of(q: &InterviewQuestion) -> usize {
        q.question[1..].parse().unwrap()
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::parse_lenient("Basic"), Difficulty::Basic);
        assert_eq!(Difficulty::parse_lenient("중급"), Difficulty::Intermediate);
        assert_eq!(Difficulty::parse_lenient("고급"), Difficulty::Advanced);
        assert_eq!(Difficulty::parse_lenient("혼합"), Difficulty::Mixed);
        assert_eq!(Difficulty::parse_lenient("expert"), Difficulty::Mixed);
        let parsed: Difficulty = serde_json::from_str(r#""advanced""#).unwrap();
        assert_eq!(parsed, Difficulty::Advanced);
    }

    #[test]
    fn test_levels_by_position() {
        let levels: Vec<_> = (0..6).map(|i| QuestionLevel::for_position(i, 6)).collect();
        assert_eq!(
            levels,
            vec![
                QuestionLevel::Basic,
                QuestionLevel::Basic,
                QuestionLevel::Intermediate,
                QuestionLevel::Intermediate,
                QuestionLevel::Advanced,
                QuestionLevel::Advanced,
            ]
        );
        assert_eq!(QuestionLevel::Advanced.time_limit(), 300);
    }

    #[test]
    fn test_basic_draws_from_first_ten() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_questions(&numbered(40), 5, Difficulty::Basic, &mut rng);
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|q| index_of(q) < 10));
        let numbers: Vec<_> = picked.iter().map(|q| q.question_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_advanced_draws_from_tail() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_questions(&numbered(40), 10, Difficulty::Advanced, &mut rng);
        assert_eq!(picked.len(), 10);
        assert!(picked.iter().all(|q| (25..40).contains(&index_of(q))));
    }

    #[test]
    fn test_mixed_counts_per_band() {
        let mut rng = StdRng::seed_from_u64(42);
        let picked = select_questions(&numbered(40), 15, Difficulty::Mixed, &mut rng);
        assert_eq!(picked.len(), 15);
        let basic = picked.iter().filter(|q| index_of(q) < 10).count();
        let intermediate = picked
            .iter()
            .filter(|q| (10..25).contains(&index_of(q)))
            .count();
        assert_eq!(basic, 3);
        assert_eq!(intermediate, 5);
        assert_eq!(picked.len() - basic - intermediate, 7);
    }

    #[test]
    fn test_mixed_small_count() {
        let mut rng = StdRng::seed_from_u64(1);
        // n = 4: 1 basic, 2 intermediate, 1 advanced
        let picked = select_questions(&numbered(40), 4, Difficulty::Mixed, &mut rng);
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn test_short_list_clamps_and_falls_back() {
        let mut rng = StdRng::seed_from_u64(3);
        let picked = select_questions(&numbered(12), 5, Difficulty::Intermediate, &mut rng);
        assert_eq!(picked.len(), 2);

        let picked = select_questions(&numbered(8), 5, Difficulty::Advanced, &mut rng);
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn test_short_pick_keeps_levels_of_requested_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let picked = select_questions(&numbered(12), 5, Difficulty::Intermediate, &mut rng);
        let levels: Vec<_> = picked.iter().map(|q| q.difficulty).collect();
        assert_eq!(levels, vec![QuestionLevel::Basic, QuestionLevel::Intermediate]);
        assert_eq!(picked[0].time_limit, 120);
        assert_eq!(picked[1].time_limit, 180);
    }

    #[test]
    fn test_time_limit_matches_level() {
        let mut rng = StdRng::seed_from_u64(9);
        for q in select_questions(&numbered(40), 9, Difficulty::Mixed, &mut rng) {
            assert_eq!(q.time_limit, q.difficulty.time_limit());
        }
    }
}
