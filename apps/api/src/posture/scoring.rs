//! Single-image posture score built from shoulder level, head height and neck angle.

use serde::{Deserialize, Serialize};

use crate::posture::landmarks::{LandmarkSet, LEFT_EAR, LEFT_SHOULDER, NOSE, RIGHT_EAR, RIGHT_SHOULDER};

/// Score used when the landmarks needed for scoring are missing.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Scores above this are reported as `normal`.
pub const NORMAL_SCORE_CUTOFF: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    Normal,
    Warning,
}

impl PostureStatus {
    pub fn from_score(score: f64) -> Self {
        if score > NORMAL_SCORE_CUTOFF {
            PostureStatus::Normal
        } else {
            PostureStatus::Warning
        }
    }
}

/// Angle in degrees between vertical and the line shoulder-centre → nose.
///
/// Returns `None` when the nose or shoulders are missing.
pub fn neck_angle(landmarks: &LandmarkSet) -> Option<f64> {
    let nose = landmarks.finite(NOSE)?;
    let (cx, cy) = landmarks.shoulder_center()?;

    let dx = nose.x - cx;
    let dy = nose.y - cy;
    // Undefined ratios (nose straight above, or level with the shoulders) count as upright.
    if dx == 0.0 || dy == 0.0 {
        return Some(0.0);
    }
    Some((dx / dy).atan().to_degrees().abs())
}

/// Posture score in `[0, 1]`; higher is better.
///
/// Deductions: uneven shoulders (up to 0.3), head not above shoulders (0.4)
/// and forward/sideways neck angle (up to 0.3).
pub fn posture_score(landmarks: &LandmarkSet) -> f64 {
    compute_score(landmarks).unwrap_or(NEUTRAL_SCORE)
}

fn compute_score(landmarks: &LandmarkSet) -> Option<f64> {
    let left_shoulder = landmarks.finite(LEFT_SHOULDER)?;
    let right_shoulder = landmarks.finite(RIGHT_SHOULDER)?;
    let left_ear = landmarks.finite(LEFT_EAR)?;
    let right_ear = landmarks.finite(RIGHT_EAR)?;
    let angle = neck_angle(landmarks)?;

    let mut score = 1.0;

    let shoulder_height_diff = (left_shoulder.y - right_shoulder.y).abs();
    score -= if shoulder_height_diff < 0.05 {
        0.0
    } else if shoulder_height_diff < 0.1 {
        0.1
    } else {
        0.3
    };

    // Image y grows downwards.
    let shoulder_center_y = (left_shoulder.y + right_shoulder.y) / 2.0;
    let ear_center_y = (left_ear.y + right_ear.y) / 2.0;
    if ear_center_y >= shoulder_center_y {
        score -= 0.4;
    }

    score -= if angle < 15.0 {
        0.0
    } else if angle < 30.0 {
        0.15
    } else {
        0.3
    };

    Some(f64::max(score, 0.0))
}
