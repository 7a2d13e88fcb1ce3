use std::collections::HashMap;

use crate::models::{Indicator, IndicatorKind, IndicatorValue, Mood, MoodScores};
use crate::mood::rules::{Condition, MoodRule, Test};

/// Outcome of scoring one set of indicators against the rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub scores: MoodScores,
    pub mood: Mood,
    pub confidence: f64,
    /// Indicators that satisfied a condition of the winning rule.
    pub evidence: Vec<IndicatorKind>,
}

struct IndicatorLookup<'a> {
    by_kind: HashMap<IndicatorKind, &'a Indicator>,
}

impl<'a> IndicatorLookup<'a> {
    fn new(indicators: &'a [Indicator]) -> Self {
        let mut by_kind = HashMap::with_capacity(indicators.len());
        for indicator in indicators {
            by_kind.entry(indicator.kind).or_insert(indicator);
        }
        Self { by_kind }
    }

    fn get(&self, kind: IndicatorKind) -> Option<&'a Indicator> {
        self.by_kind.get(&kind).copied()
    }

    /// `None` when the indicator is absent; absent indicators neither vote
    /// nor count towards the rule's total weight.
    fn satisfies(&self, condition: &Condition) -> Option<bool> {
        let indicator = self.get(condition.indicator)?;
        Some(test_value(&indicator.value, condition.test))
    }
}

fn test_value(value: &IndicatorValue, test: Test) -> bool {
    match (test, value) {
        (Test::Min(threshold), IndicatorValue::Number(v)) => *v >= threshold,
        (Test::Max(threshold), IndicatorValue::Number(v)) => *v <= threshold,
        (Test::Flag(expected), IndicatorValue::Flag(v)) => *v == expected,
        _ => false,
    }
}

/// Score of one rule, in [0, 1].
fn score_rule(rule: &MoodRule, lookup: &IndicatorLookup<'_>) -> (f64, Vec<IndicatorKind>) {
    if rule.requires.iter().any(|kind| lookup.get(*kind).is_none()) {
        return (0.0, Vec::new());
    }

    let mut score = 0.0;
    let mut total_weight = 0.0;
    let mut evidence = Vec::new();

    for condition in rule.conditions {
        let Some(satisfied) = lookup.satisfies(condition) else {
            continue;
        };
        let weight = lookup
            .get(condition.indicator)
            .map(|indicator| indicator.weight)
            .unwrap_or(1.0);
        total_weight += weight;
        if satisfied {
            score += weight;
            if !evidence.contains(&condition.indicator) {
                evidence.push(condition.indicator);
            }
        }
    }

    let raw = score / f64::max(total_weight, 1.0);

    let bonus: f64 = rule
        .bonuses
        .iter()
        .filter(|bonus| {
            bonus
                .all_of
                .iter()
                .all(|condition| lookup.satisfies(condition) == Some(true))
        })
        .map(|bonus| bonus.amount)
        .sum();

    ((raw + bonus).clamp(0.0, 1.0), evidence)
}

/// Apply the rule table to indicators and pick the primary mood.
///
/// Ties resolve to the rule declared first. A winner below
/// `confidence_floor` is replaced by [`Mood::Neutral`] carrying that low
/// confidence.
pub fn score_moods(indicators: &[Indicator], rules: &[MoodRule], confidence_floor: f64) -> ScoreCard {
    let lookup = IndicatorLookup::new(indicators);

    let mut entries = Vec::with_capacity(rules.len());
    let mut best: Option<(Mood, f64, Vec<IndicatorKind>)> = None;

    for rule in rules {
        let (score, evidence) = score_rule(rule, &lookup);
        entries.push((rule.mood, score));

        // Strictly greater keeps the earlier declaration on ties.
        let is_better = match &best {
            Some((_, best_score, _)) => score > *best_score,
            None => true,
        };
        if is_better {
            best = Some((rule.mood, score, evidence));
        }
    }

    let scores = MoodScores::new(entries);
    match best {
        Some((mood, confidence, evidence)) if confidence >= confidence_floor && confidence > 0.0 => {
            ScoreCard {
                scores,
                mood,
                confidence,
                evidence,
            }
        }
        Some((_, confidence, _)) => ScoreCard {
            scores,
            mood: Mood::Neutral,
            confidence,
            evidence: Vec::new(),
        },
        None => ScoreCard {
            scores,
            mood: Mood::Neutral,
            confidence: 0.0,
            evidence: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorKind::*;
    use crate::mood::rules::{Bonus, RULE_TABLE};

    fn num(kind: IndicatorKind, value: f64) -> Indicator {
        Indicator::number(kind, value, String::new())
    }

    fn flag(kind: IndicatorKind, value: bool) -> Indicator {
        Indicator::flag(kind, value, String::new())
    }

    const TIE_RULES: &[MoodRule] = &[
        MoodRule {
            mood: Mood::Focused,
            requires: &[],
            conditions: &[Condition {
                indicator: CurrentStreak,
                test: Test::Min(1.0),
            }],
            bonuses: &[],
        },
        MoodRule {
            mood: Mood::Motivated,
            requires: &[],
            conditions: &[Condition {
                indicator: CurrentStreak,
                test: Test::Min(1.0),
            }],
            bonuses: &[],
        },
    ];

    #[test]
    fn ties_resolve_to_declaration_order() {
        let indicators = [num(CurrentStreak, 5.0)];
        let card = score_moods(&indicators, TIE_RULES, 0.3);
        assert_eq!(card.scores.get(Mood::Focused), card.scores.get(Mood::Motivated));
        assert_eq!(card.mood, Mood::Focused);

        let reversed = [TIE_RULES[1], TIE_RULES[0]];
        let card = score_moods(&indicators, &reversed, 0.3);
        assert_eq!(card.mood, Mood::Motivated);
    }

    #[test]
    fn raw_score_is_damped_when_little_weight_is_present() {
        // 0.4 of satisfied weight against a total below 1.0 divides by 1.0.
        let rules = [MoodRule {
            mood: Mood::Focused,
            requires: &[],
            conditions: &[Condition {
                indicator: FocusQuality,
                test: Test::Min(20.0),
            }],
            bonuses: &[],
        }];
        let card = score_moods(&[num(FocusQuality, 30.0)], &rules, 0.3);
        assert!((card.confidence - 0.4).abs() < 1e-9);
        assert_eq!(card.mood, Mood::Focused);
    }

    #[test]
    fn bonuses_are_capped_at_one() {
        let rules = [MoodRule {
            mood: Mood::Celebrating,
            requires: &[],
            conditions: &[Condition {
                indicator: CurrentStreak,
                test: Test::Min(7.0),
            }],
            bonuses: &[Bonus {
                all_of: &[
                    Condition {
                        indicator: CurrentStreak,
                        test: Test::Min(7.0),
                    },
                    Condition {
                        indicator: CompletionRate,
                        test: Test::Min(0.8),
                    },
                ],
                amount: 0.5,
            }],
        }];
        let card = score_moods(&[num(CurrentStreak, 10.0), num(CompletionRate, 0.9)], &rules, 0.3);
        assert_eq!(card.confidence, 1.0);
    }

    #[test]
    fn low_scores_fall_back_to_neutral() {
        let card = score_moods(&[num(CurrentStreak, 0.0), num(TodayPomodoros, 0.0)], RULE_TABLE, 0.3);
        assert_eq!(card.mood, Mood::Neutral);
        assert!(card.confidence < 0.3);
        assert!(card.evidence.is_empty());
        assert_eq!(card.scores.len(), RULE_TABLE.len());
    }

    #[test]
    fn missing_required_indicator_zeroes_the_mood() {
        let indicators = [
            num(OverdueTasks, 5.0),
            num(CurrentStreak, 0.0),
            num(TodayPomodoros, 0.0),
        ];
        let card = score_moods(&indicators, RULE_TABLE, 0.3);
        assert_eq!(card.scores.get(Mood::Struggling), Some(0.0));
    }

    #[test]
    fn flag_conditions_only_match_boolean_indicators() {
        assert!(test_value(&IndicatorValue::Flag(true), Test::Flag(true)));
        assert!(!test_value(&IndicatorValue::Number(1.0), Test::Flag(true)));
        assert!(!test_value(&IndicatorValue::Flag(true), Test::Min(0.0)));
        let card = score_moods(
            &[num(FocusQuality, 25.0), flag(InPeakWindow, true)],
            RULE_TABLE,
            0.3,
        );
        assert_eq!(card.mood, Mood::Focused);
        assert!(card.evidence.contains(&InPeakWindow));
    }

    #[test]
    fn struggling_score_never_drops_as_overdue_grows() {
        let mut previous = 0.0;
        for overdue in 0..12 {
            let indicators = [
                num(CompletionRate, 0.5),
                num(OverdueTasks, overdue as f64),
                num(CurrentStreak, 1.0),
                num(TodayPomodoros, 1.0),
                num(OverwhelmLevel, 0.2),
            ];
            let card = score_moods(&indicators, RULE_TABLE, 0.3);
            let score = card.scores.get(Mood::Struggling).expect("struggling score");
            assert!(score >= previous, "overdue={overdue}: {score} < {previous}");
            previous = score;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn every_score_stays_in_unit_interval() {
        let indicators = [
            num(CompletionRate, 1.0),
            num(OverdueTasks, 40.0),
            num(CurrentStreak, 90.0),
            num(TodayPomodoros, 12.0),
            num(ActivityTrend, 9.0),
            num(FocusQuality, 50.0),
            num(OverwhelmLevel, 1.0),
            num(TimingAlignment, 1.0),
            flag(InPeakWindow, true),
            num(IncompleteSessions, 4.0),
            num(TaskVariety, 1.0),
            num(InactiveDays, 5.0),
            num(RecentCompletionRatio, 0.1),
        ];
        let card = score_moods(&indicators, RULE_TABLE, 0.3);
        assert!((0.0..=1.0).contains(&card.confidence));
        for (_, score) in card.scores.iter() {
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
