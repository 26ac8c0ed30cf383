//! Monitor settings shared by the posture endpoints. Held in memory only.

use serde::{Deserialize, Serialize};

use crate::posture::comparison::MovementThreshold;

pub const MIN_INTERVAL_SECS: u64 = 3;
const DEFAULT_INTERVAL_SECS: u64 = 5;
const DEFAULT_ALERT_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureSettings {
    pub movement_threshold: MovementThreshold,
    /// Seconds between captures.
    pub interval_secs: u64,
    /// Consecutive bad readings before the user is alerted.
    pub alert_count: u32,
    pub background_mode: bool,
    pub notification_enabled: bool,
}

impl Default for PostureSettings {
    fn default() -> Self {
        Self {
            movement_threshold: MovementThreshold::Medium,
            interval_secs: DEFAULT_INTERVAL_SECS,
            alert_count: DEFAULT_ALERT_COUNT,
            background_mode: false,
            notification_enabled: true,
        }
    }
}

impl PostureSettings {
    /// Clamps values into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.interval_secs = self.interval_secs.max(MIN_INTERVAL_SECS);
        self.alert_count = self.alert_count.max(1);
        self
    }
}
