//! Declarative rule table: which indicator thresholds vote for which mood.
//!
//! The table is pure data. Rule order is the tie-break precedence used by the
//! scorer, so the more specific moods are declared before the broader ones.

use crate::models::{IndicatorKind, Mood};

/// Stored with every persisted mood snapshot; bump whenever thresholds,
/// weights or rule order change.
pub const RULE_TABLE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Test {
    /// Satisfied when the numeric value is >= the threshold.
    Min(f64),
    /// Satisfied when the numeric value is <= the threshold.
    Max(f64),
    /// Satisfied when the boolean value equals the flag.
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub indicator: IndicatorKind,
    pub test: Test,
}

/// Extra score awarded when every condition holds at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonus {
    pub all_of: &'static [Condition],
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodRule {
    pub mood: Mood,
    /// Indicators that must be present for the mood to score at all.
    pub requires: &'static [IndicatorKind],
    pub conditions: &'static [Condition],
    pub bonuses: &'static [Bonus],
}

const fn min(indicator: IndicatorKind, threshold: f64) -> Condition {
    Condition {
        indicator,
        test: Test::Min(threshold),
    }
}

const fn max(indicator: IndicatorKind, threshold: f64) -> Condition {
    Condition {
        indicator,
        test: Test::Max(threshold),
    }
}

const fn flag(indicator: IndicatorKind, expected: bool) -> Condition {
    Condition {
        indicator,
        test: Test::Flag(expected),
    }
}

use IndicatorKind::*;

pub static RULE_TABLE: &[MoodRule] = &[
    MoodRule {
        mood: Mood::Celebrating,
        requires: &[CompletionRate],
        conditions: &[
            min(CurrentStreak, 7.0),
            min(CompletionRate, 0.8),
            min(ActivityTrend, 2.0),
        ],
        bonuses: &[
            Bonus {
                all_of: &[min(CurrentStreak, 7.0), min(CompletionRate, 0.8)],
                amount: 0.25,
            },
            Bonus {
                all_of: &[min(CurrentStreak, 7.0), min(ActivityTrend, 2.0)],
                amount: 0.15,
            },
        ],
    },
    MoodRule {
        mood: Mood::Motivated,
        requires: &[],
        conditions: &[
            min(CompletionRate, 0.6),
            min(CurrentStreak, 2.0),
            min(TodayPomodoros, 3.0),
            min(ActivityTrend, 1.0),
        ],
        bonuses: &[
            Bonus {
                all_of: &[
                    min(CompletionRate, 0.7),
                    min(CurrentStreak, 3.0),
                    min(TodayPomodoros, 3.0),
                ],
                amount: 0.3,
            },
            Bonus {
                all_of: &[min(ActivityTrend, 1.0), min(TodayPomodoros, 3.0)],
                amount: 0.1,
            },
        ],
    },
    MoodRule {
        mood: Mood::Focused,
        requires: &[FocusQuality],
        conditions: &[
            min(FocusQuality, 20.0),
            min(TodayPomodoros, 3.0),
            flag(InPeakWindow, true),
            max(TaskVariety, 2.0),
        ],
        bonuses: &[
            Bonus {
                all_of: &[min(TimingAlignment, 0.8), min(FocusQuality, 20.0)],
                amount: 0.2,
            },
            Bonus {
                all_of: &[min(TodayPomodoros, 3.0), max(TaskVariety, 2.0)],
                amount: 0.1,
            },
        ],
    },
    MoodRule {
        mood: Mood::Overwhelmed,
        requires: &[],
        conditions: &[
            min(OverwhelmLevel, 0.7),
            min(OverdueTasks, 3.0),
            max(CompletionRate, 0.4),
            max(RecentCompletionRatio, 0.4),
            min(IncompleteSessions, 3.0),
        ],
        bonuses: &[
            Bonus {
                all_of: &[min(OverwhelmLevel, 0.7), min(OverdueTasks, 3.0)],
                amount: 0.3,
            },
            Bonus {
                all_of: &[min(OverwhelmLevel, 0.7), max(CompletionRate, 0.4)],
                amount: 0.2,
            },
        ],
    },
    MoodRule {
        mood: Mood::Struggling,
        requires: &[CompletionRate],
        conditions: &[
            min(OverdueTasks, 2.0),
            max(CompletionRate, 0.3),
            max(CurrentStreak, 0.0),
            max(TodayPomodoros, 0.0),
        ],
        bonuses: &[
            Bonus {
                all_of: &[min(OverdueTasks, 2.0), max(CompletionRate, 0.3)],
                amount: 0.3,
            },
            Bonus {
                all_of: &[
                    min(OverdueTasks, 1.0),
                    max(CurrentStreak, 0.0),
                    max(TodayPomodoros, 0.0),
                ],
                amount: 0.1,
            },
        ],
    },
    MoodRule {
        mood: Mood::Returning,
        requires: &[InactiveDays],
        conditions: &[
            min(InactiveDays, 2.0),
            max(CurrentStreak, 0.0),
            max(TodayPomodoros, 0.0),
        ],
        bonuses: &[Bonus {
            all_of: &[min(InactiveDays, 3.0), max(CurrentStreak, 0.0)],
            amount: 0.2,
        }],
    },
];
