//! Baseline-vs-current posture comparison.
//!
//! The difference between two landmark sets is the mean 3-D displacement of the
//! key joints (nose, ears, shoulders), scaled by [`DIFFERENCE_SCALE`] and capped at 1.0.
//! A [`MovementThreshold`] tier turns that scalar into normal / warning / alert.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::posture::landmarks::{LandmarkSet, KEY_LANDMARKS};
use crate::posture::scoring::posture_score;

/// Difference reported when the two sets cannot be compared.
pub const WORST_DIFFERENCE: f64 = 1.0;
/// Multiplier applied to the mean key-joint displacement.
pub const DIFFERENCE_SCALE: f64 = 1.5;

/// Sensitivity preset chosen by the user. Unknown labels fall back to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MovementThreshold {
    Low,
    #[default]
    Medium,
    High,
}

impl MovementThreshold {
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => MovementThreshold::Low,
            "high" => MovementThreshold::High,
            _ => MovementThreshold::Medium,
        }
    }

    pub fn thresholds(self) -> Thresholds {
        match self {
            MovementThreshold::Low => Thresholds {
                normal: 0.25,
                warning: 0.45,
                description: "Sensitive: small movements are reported",
            },
            MovementThreshold::Medium => Thresholds {
                normal: 0.35,
                warning: 0.6,
                description: "Balanced: moderate movements are reported",
            },
            MovementThreshold::High => Thresholds {
                normal: 0.5,
                warning: 0.75,
                description: "Relaxed: only large movements are reported",
            },
        }
    }
}

impl From<String> for MovementThreshold {
    fn from(label: String) -> Self {
        MovementThreshold::parse_lenient(&label)
    }
}

impl fmt::Display for MovementThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MovementThreshold::Low => "low",
            MovementThreshold::Medium => "medium",
            MovementThreshold::High => "high",
        };
        f.write_str(label)
    }
}

/// Cutoffs for one tier. `difference < normal` is normal, `< warning` is a warning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub normal: f64,
    pub warning: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    Normal,
    Warning,
    Alert,
}

impl ComparisonStatus {
    pub fn message(self) -> &'static str {
        match self {
            ComparisonStatus::Normal => "Your posture looks good.",
            ComparisonStatus::Warning => "Your posture has shifted slightly.",
            ComparisonStatus::Alert => "Your posture has shifted a lot!",
        }
    }
}

/// Full comparison result returned to the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct PostureComparison {
    pub difference: f64,
    pub status: ComparisonStatus,
    pub message: &'static str,
    pub base_score: f64,
    pub current_score: f64,
    pub base_landmarks: LandmarkSet,
    pub current_landmarks: LandmarkSet,
    pub thresholds_used: Thresholds,
    pub movement_threshold: MovementThreshold,
}

/// Scalar distance between two poses in `[0, 1]`.
///
/// Degrades to [`WORST_DIFFERENCE`] unless both sets are complete.
pub fn landmark_difference(base: &LandmarkSet, current: &LandmarkSet) -> f64 {
    if !base.is_complete() || !current.is_complete() {
        return WORST_DIFFERENCE;
    }

    let distances: Vec<f64> = KEY_LANDMARKS
        .iter()
        .filter_map(|&idx| Some(base.get(idx)?.distance(current.get(idx)?)))
        .collect();

    if distances.is_empty() {
        return WORST_DIFFERENCE;
    }

    let mean = distances.iter().sum::<f64>() / distances.len() as f64;
    (mean * DIFFERENCE_SCALE).min(WORST_DIFFERENCE)
}

pub fn classify(difference: f64, tier: MovementThreshold) -> ComparisonStatus {
    let thresholds = tier.thresholds();
    if difference < thresholds.normal {
        ComparisonStatus::Normal
    } else if difference < thresholds.warning {
        ComparisonStatus::Warning
    } else {
        ComparisonStatus::Alert
    }
}

/// Compares a current pose against the captured baseline.
pub fn compare(
    base: LandmarkSet,
    current: LandmarkSet,
    tier: MovementThreshold,
) -> PostureComparison {
    let difference = landmark_difference(&base, &current);
    let status = classify(difference, tier);

    PostureComparison {
        difference,
        status,
        message: status.message(),
        base_score: posture_score(&base),
        current_score: posture_score(&current),
        base_landmarks: base,
        current_landmarks: current,
        thresholds_used: tier.thresholds(),
        movement_threshold: tier,
    }
}
