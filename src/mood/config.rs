use serde::{Deserialize, Serialize};

/// Configuration for mood classification with tunable thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Winning scores below this are reported as neutral
    pub confidence_floor: f64,

    /// Confidence attached to every detected transition
    pub transition_confidence: f64,

    /// Cached results older than this are recomputed even inside the same minute
    pub cache_ttl_secs: i64,

    /// History analysis
    pub history_min_samples: usize,
    pub history_min_days: u32,
    pub history_max_days: u32,

    /// Personality tone falls back to "supportive" below this confidence
    pub low_confidence_tone_threshold: f64,

    /// Output caps, never above 3 each
    pub max_insights: usize,
    pub max_recommendations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.3,
            transition_confidence: 0.7,
            cache_ttl_secs: 30 * 60,
            history_min_samples: 5,
            history_min_days: 7,
            history_max_days: 90,
            low_confidence_tone_threshold: 0.5,
            max_insights: 3,
            max_recommendations: 3,
        }
    }
}

impl EngineConfig {
    pub fn clamp_history_days(&self, days: u32) -> u32 {
        days.clamp(self.history_min_days, self.history_max_days.max(self.history_min_days))
    }
}
