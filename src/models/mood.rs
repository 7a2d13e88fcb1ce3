use std::fmt;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::mood::rules::RULE_TABLE_VERSION;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Motivated,
    Struggling,
    Focused,
    Overwhelmed,
    Celebrating,
    Returning,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Motivated => "motivated",
            Mood::Struggling => "struggling",
            Mood::Focused => "focused",
            Mood::Overwhelmed => "overwhelmed",
            Mood::Celebrating => "celebrating",
            Mood::Returning => "returning",
            Mood::Neutral => "neutral",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "motivated" => Ok(Mood::Motivated),
            "struggling" => Ok(Mood::Struggling),
            "focused" => Ok(Mood::Focused),
            "overwhelmed" => Ok(Mood::Overwhelmed),
            "celebrating" => Ok(Mood::Celebrating),
            "returning" => Ok(Mood::Returning),
            "neutral" => Ok(Mood::Neutral),
            other => Err(anyhow!("unknown mood '{other}'")),
        }
    }

    /// Moods that count towards decline risk.
    pub fn is_declining(&self) -> bool {
        matches!(self, Mood::Struggling | Mood::Overwhelmed)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    CompletionRate,
    OverdueTasks,
    CurrentStreak,
    TodayPomodoros,
    ActivityTrend,
    FocusQuality,
    OverwhelmLevel,
    TimingAlignment,
    InPeakWindow,
    IncompleteSessions,
    TaskVariety,
    InactiveDays,
    RecentCompletionRatio,
}

impl IndicatorKind {
    /// Reliability of the signal. Streak and overdue counts are the most
    /// trustworthy, clock-derived signals the least.
    pub fn weight(&self) -> f64 {
        match self {
            IndicatorKind::OverdueTasks => 0.9,
            IndicatorKind::CompletionRate => 0.8,
            IndicatorKind::CurrentStreak => 0.7,
            IndicatorKind::TodayPomodoros => 0.6,
            IndicatorKind::OverwhelmLevel => 0.6,
            IndicatorKind::InactiveDays => 0.6,
            IndicatorKind::ActivityTrend => 0.5,
            IndicatorKind::IncompleteSessions => 0.5,
            IndicatorKind::RecentCompletionRatio => 0.5,
            IndicatorKind::FocusQuality => 0.4,
            IndicatorKind::TaskVariety => 0.4,
            IndicatorKind::TimingAlignment => 0.3,
            IndicatorKind::InPeakWindow => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::CompletionRate => "completion_rate",
            IndicatorKind::OverdueTasks => "overdue_tasks",
            IndicatorKind::CurrentStreak => "current_streak",
            IndicatorKind::TodayPomodoros => "today_pomodoros",
            IndicatorKind::ActivityTrend => "activity_trend",
            IndicatorKind::FocusQuality => "focus_quality",
            IndicatorKind::OverwhelmLevel => "overwhelm_level",
            IndicatorKind::TimingAlignment => "timing_alignment",
            IndicatorKind::InPeakWindow => "in_peak_window",
            IndicatorKind::IncompleteSessions => "incomplete_sessions",
            IndicatorKind::TaskVariety => "task_variety",
            IndicatorKind::InactiveDays => "inactive_days",
            IndicatorKind::RecentCompletionRatio => "recent_completion_ratio",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IndicatorValue {
    Number(f64),
    Flag(bool),
}

impl IndicatorValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IndicatorValue::Number(value) => Some(*value),
            IndicatorValue::Flag(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            IndicatorValue::Flag(value) => Some(*value),
            IndicatorValue::Number(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Indicator {
    #[serde(rename = "indicator_type")]
    pub kind: IndicatorKind,
    pub value: IndicatorValue,
    pub weight: f64,
    pub description: String,
}

impl Indicator {
    pub fn number(kind: IndicatorKind, value: f64, description: String) -> Self {
        Self {
            kind,
            value: IndicatorValue::Number(value),
            weight: kind.weight(),
            description,
        }
    }

    pub fn flag(kind: IndicatorKind, value: bool, description: String) -> Self {
        Self {
            kind,
            value: IndicatorValue::Flag(value),
            weight: kind.weight(),
            description,
        }
    }
}

/// Per-mood scores in rule declaration order.
///
/// Serialized as a JSON object; the order of keys is stable across calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodScores(Vec<(Mood, f64)>);

impl MoodScores {
    pub fn new(entries: Vec<(Mood, f64)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, mood: Mood) -> Option<f64> {
        self.0
            .iter()
            .find(|(candidate, _)| *candidate == mood)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mood, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for MoodScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (mood, score) in &self.0 {
            map.serialize_entry(mood.as_str(), score)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodTransition {
    pub from_mood: Mood,
    pub to_mood: Mood,
    pub timestamp: DateTime<Utc>,
    pub trigger_factors: Vec<String>,
    pub confidence: f64,
}

/// Output of one classification call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodResult {
    #[serde(rename = "current_mood")]
    pub mood: Mood,
    pub confidence: f64,
    #[serde(rename = "mood_scores")]
    pub scores: MoodScores,
    pub indicators: Vec<Indicator>,
    pub transition: Option<MoodTransition>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

impl MoodResult {
    /// Unobtrusive default for callers that could not classify at all.
    pub fn fallback() -> Self {
        Self {
            mood: Mood::Neutral,
            confidence: 0.0,
            scores: MoodScores::default(),
            indicators: Vec::new(),
            transition: None,
            insights: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// A persisted mood observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodRecord {
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

impl MoodRecord {
    pub fn new(mood: Mood, timestamp: DateTime<Utc>) -> Self {
        Self { mood, timestamp }
    }
}

/// Row written after every fresh classification.
#[derive(Debug, Clone)]
pub struct MoodSnapshotRecord {
    pub user_id: String,
    pub mood: Mood,
    pub confidence: f64,
    /// JSON array of the indicators that produced the mood.
    pub indicators: String,
    pub recorded_at: DateTime<Utc>,
    /// [`RULE_TABLE_VERSION`] of the table that scored this snapshot.
    pub rule_table_version: u32,
}

impl MoodSnapshotRecord {
    pub fn from_result(user_id: &str, result: &MoodResult, recorded_at: DateTime<Utc>) -> Self {
        let indicators = serde_json::to_string(&result.indicators).unwrap_or_else(|_| "[]".into());
        Self {
            user_id: user_id.to_string(),
            mood: result.mood,
            confidence: result.confidence,
            indicators,
            recorded_at,
            rule_table_version: RULE_TABLE_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_names_round_trip_through_parse() {
        for mood in [
            Mood::Motivated,
            Mood::Struggling,
            Mood::Focused,
            Mood::Overwhelmed,
            Mood::Celebrating,
            Mood::Returning,
            Mood::Neutral,
        ] {
            assert_eq!(Mood::parse(mood.as_str()).expect("parse"), mood);
        }
        assert!(Mood::parse("encouraging").is_err());
    }

    #[test]
    fn result_serializes_with_contract_field_names() {
        let mut result = MoodResult::fallback();
        result.scores = MoodScores::new(vec![(Mood::Celebrating, 0.5), (Mood::Motivated, 0.25)]);
        result.indicators.push(Indicator::flag(
            IndicatorKind::InPeakWindow,
            true,
            "Working inside peak hours".into(),
        ));

        let value = serde_json::to_value(&result).expect("serialize");
        let object = value.as_object().expect("object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "confidence",
                "current_mood",
                "indicators",
                "insights",
                "mood_scores",
                "recommendations",
                "transition"
            ]
        );
        assert_eq!(value["current_mood"], "neutral");
        assert_eq!(value["mood_scores"]["celebrating"], 0.5);
        assert_eq!(value["indicators"][0]["indicator_type"], "in_peak_window");
        assert_eq!(value["indicators"][0]["value"], true);
        assert!(value["transition"].is_null());
    }
}
