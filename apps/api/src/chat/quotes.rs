//! Fixed quote catalogue keyed by emotion.

use std::fmt;

use rand::{seq::SliceRandom, thread_rng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Emotion {
    Sad,
    Angry,
    Anxious,
    Happy,
    #[default]
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Anxious,
        Emotion::Happy,
        Emotion::Neutral,
    ];

    /// Case-insensitive; anything unrecognised is `Neutral`.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "sad" => Emotion::Sad,
            "angry" => Emotion::Angry,
            "anxious" => Emotion::Anxious,
            "happy" => Emotion::Happy,
            _ => Emotion::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Anxious => "anxious",
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
        }
    }
}

impl From<String> for Emotion {
    fn from(label: String) -> Self {
        Emotion::parse_lenient(&label)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SAD: &[&str] = &[
    "힘든 시간은 지나가지만, 강한 사람은 남는다.",
    "어둠이 깊을수록 새벽은 더욱 밝게 온다.",
    "지금의 아픔이 내일의 지혜가 될 거예요.",
    "괜찮지 않아도 괜찮아요. 천천히 회복하면 돼요.",
    "슬픔도 삶의 소중한 한 부분이에요.",
];

const ANGRY: &[&str] = &[
    "분노는 잠깐이지만, 후회는 오래간다.",
    "잠깐 멈추고 깊게 숨을 쉬어보세요.",
    "화가 날수록 한 번 더 생각하는 지혜가 필요해요.",
    "감정은 파도와 같아요. 곧 잔잔해질 거예요.",
    "분노 뒤에 숨은 진짜 마음을 들여다보세요.",
];

const ANXIOUS: &[&str] = &[
    "걱정의 대부분은 실제로 일어나지 않는다.",
    "한 번에 한 가지씩, 천천히 해결하면 돼요.",
    "완벽하지 않아도 충분해요.",
    "지금 이 순간에 집중하고 숨을 깊게 들이마셔 보세요.",
    "걱정은 내일의 슬픔을 덜어주지 못하고 오늘의 힘만 빼앗아요.",
];

const HAPPY: &[&str] = &[
    "행복은 나누면 배가 된다.",
    "오늘의 기쁨을 내일의 힘으로 저장해두세요.",
    "행복한 순간들이 모여 행복한 인생이 된다.",
    "당신의 웃음이 세상을 더 밝게 만들어요.",
    "이 순간의 행복을 마음 깊이 간직하세요.",
];

const NEUTRAL: &[&str] = &[
    "평범한 일상 속에도 작은 기적이 숨어 있다.",
    "고요한 마음에서 깊은 지혜가 나온다.",
    "오늘 하루도 충분히 의미 있는 시간이었어요.",
    "잠시 멈춰 자신을 돌아보는 시간도 필요해요.",
    "작은 변화가 큰 차이를 만들어요.",
];

pub fn quotes_for(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Sad => SAD,
        Emotion::Angry => ANGRY,
        Emotion::Anxious => ANXIOUS,
        Emotion::Happy => HAPPY,
        Emotion::Neutral => NEUTRAL,
    }
}

pub fn random_quote(emotion: Emotion) -> &'static str {
    quotes_for(emotion)
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or(NEUTRAL[0])
}
