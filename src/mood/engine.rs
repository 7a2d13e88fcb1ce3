use chrono::{DateTime, Utc};

use crate::models::{BehaviorSnapshot, MoodRecord, MoodResult};
use crate::mood::{
    config::EngineConfig,
    indicators::{extract_indicators, local_hour},
    insights::generate_guidance,
    rules::{MoodRule, RULE_TABLE},
    scoring::score_moods,
    transition::detect_transition,
};

/// Pure classification pipeline: indicators, scoring, transition, guidance.
///
/// No I/O and no clock reads; `now` and the previous mood are inputs, so the
/// same arguments always produce the same result.
#[derive(Debug, Clone)]
pub struct MoodEngine {
    rules: &'static [MoodRule],
    config: EngineConfig,
}

impl MoodEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rules(RULE_TABLE, config)
    }

    pub fn with_rules(rules: &'static [MoodRule], config: EngineConfig) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classify(
        &self,
        snapshot: &BehaviorSnapshot,
        now: DateTime<Utc>,
        previous: Option<&MoodRecord>,
    ) -> MoodResult {
        let indicators = extract_indicators(snapshot, local_hour(snapshot, now));
        let card = score_moods(&indicators, self.rules, self.config.confidence_floor);
        let transition =
            detect_transition(previous, card.mood, now, self.config.transition_confidence);
        let guidance = generate_guidance(
            card.mood,
            &indicators,
            &card.evidence,
            transition.as_ref(),
            self.config.max_insights,
            self.config.max_recommendations,
        );

        MoodResult {
            mood: card.mood,
            confidence: card.confidence,
            scores: card.scores,
            indicators,
            transition,
            insights: guidance.insights,
            recommendations: guidance.recommendations,
        }
    }
}

impl Default for MoodEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
