use chrono::{DateTime, Utc};

use crate::models::{Mood, MoodRecord, MoodTransition};

/// Known transition causes. `None` as the source matches any previous mood.
const TRIGGER_TABLE: &[(Option<Mood>, Mood, &str)] = &[
    (Some(Mood::Motivated), Mood::Overwhelmed, "increase in workload"),
    (Some(Mood::Struggling), Mood::Motivated, "pending tasks completed"),
    (Some(Mood::Focused), Mood::Celebrating, "goals reached"),
    (Some(Mood::Overwhelmed), Mood::Focused, "workload brought under control"),
    (Some(Mood::Celebrating), Mood::Struggling, "streak broken"),
    (Some(Mood::Struggling), Mood::Overwhelmed, "overdue work piling up"),
    (None, Mood::Returning, "back after a period of inactivity"),
];

/// Trigger factors for a known (from, to) pair; unknown pairs get none.
pub fn trigger_factors(from: Mood, to: Mood) -> Vec<String> {
    TRIGGER_TABLE
        .iter()
        .filter(|(source, target, _)| *target == to && source.map_or(true, |s| s == from))
        .map(|(_, _, trigger)| trigger.to_string())
        .collect()
}

/// Compare a freshly classified mood with the last persisted one.
///
/// Returns `None` on a first classification and when the mood is unchanged.
pub fn detect_transition(
    previous: Option<&MoodRecord>,
    current: Mood,
    now: DateTime<Utc>,
    confidence: f64,
) -> Option<MoodTransition> {
    let previous = previous?;
    if previous.mood == current {
        return None;
    }

    Some(MoodTransition {
        from_mood: previous.mood,
        to_mood: current,
        timestamp: now,
        trigger_factors: trigger_factors(previous.mood, current),
        confidence,
    })
}
