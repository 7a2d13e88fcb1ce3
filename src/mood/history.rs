//! Aggregation of past mood observations into pattern, trigger, stability and
//! decline-risk reports.

use serde::Serialize;

use crate::models::{Mood, MoodRecord};
use crate::mood::transition::trigger_factors;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodShare {
    pub mood: Mood,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransitionPattern {
    pub from_mood: Mood,
    pub to_mood: Mood,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriggerCount {
    pub trigger: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeclineRisk {
    /// Share of struggling/overwhelmed observations in the newest third.
    pub recent_share: f64,
    /// Same share over the older two thirds.
    pub earlier_share: f64,
    pub score: f64,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryAnalysis {
    pub period_days: u32,
    pub sample_count: usize,
    pub dominant_mood: Mood,
    pub distribution: Vec<MoodShare>,
    pub dominant_transition: Option<TransitionPattern>,
    pub common_triggers: Vec<TriggerCount>,
    pub stability_score: f64,
    pub decline_risk: DeclineRisk,
    pub likely_next_mood: Option<Mood>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryReport {
    /// Not an error: too few observations to say anything reliable.
    InsufficientData {
        period_days: u32,
        samples: usize,
        required: usize,
    },
    Analyzed(HistoryAnalysis),
}

impl HistoryReport {
    pub fn analysis(&self) -> Option<&HistoryAnalysis> {
        match self {
            HistoryReport::Analyzed(analysis) => Some(analysis),
            HistoryReport::InsufficientData { .. } => None,
        }
    }
}

/// Near-term outlook combining the current classification with history.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodPrediction {
    pub current_mood: Mood,
    pub confidence: f64,
    /// `None` while history is insufficient.
    pub decline_risk: Option<DeclineRisk>,
    pub overall_risk: RiskLevel,
    pub likely_next_mood: Option<Mood>,
    pub preventive_actions: Vec<String>,
}

impl MoodPrediction {
    /// A declining current mood is at least medium risk, even with a calm history.
    pub fn new(current_mood: Mood, confidence: f64, report: &HistoryReport, max_actions: usize) -> Self {
        let analysis = report.analysis();
        let decline_risk = analysis.map(|a| a.decline_risk.clone());
        let likely_next_mood = analysis.and_then(|a| a.likely_next_mood);

        let history_level = decline_risk.as_ref().map_or(RiskLevel::Low, |risk| risk.level);
        let current_level = if current_mood.is_declining() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        let overall_risk = history_level.max(current_level);

        let mut preventive_actions =
            preventive_actions(current_mood, overall_risk, likely_next_mood);
        preventive_actions.truncate(max_actions);

        Self {
            current_mood,
            confidence,
            decline_risk,
            overall_risk,
            likely_next_mood,
            preventive_actions,
        }
    }
}

fn preventive_actions(current: Mood, risk: RiskLevel, likely_next: Option<Mood>) -> Vec<String> {
    let mut actions = Vec::new();
    if risk == RiskLevel::High {
        actions.push("Clear tomorrow's schedule of anything non-essential".to_string());
    }
    if current.is_declining() {
        actions.push("Pick a single small task and finish it before starting anything new".to_string());
    } else if let Some(next) = likely_next.filter(|next| next.is_declining()) {
        actions.push(format!(
            "You often move to {next} from here; keep the next few days lightly planned"
        ));
    }
    if risk >= RiskLevel::Medium {
        actions.push("Schedule short breaks between focus sessions".to_string());
    }
    if actions.is_empty() {
        actions.push("Keep your current routine; it is working".to_string());
    }
    actions
}

/// Counts keyed by first appearance, so ties resolve to the earliest key.
fn count_in_order<K: PartialEq>(items: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(key, _)| *key == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    counts
}

fn most_frequent<K: PartialEq + Clone>(counts: &[(K, usize)]) -> Option<(K, usize)> {
    let mut best: Option<&(K, usize)> = None;
    for entry in counts {
        if best.map_or(true, |(_, count)| entry.1 > *count) {
            best = Some(entry);
        }
    }
    best.cloned()
}

fn declining_share(records: &[MoodRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let declining = records.iter().filter(|r| r.mood.is_declining()).count();
    declining as f64 / records.len() as f64
}

fn decline_risk(records: &[MoodRecord]) -> DeclineRisk {
    let recent_len = records.len().div_ceil(3);
    let (earlier, recent) = records.split_at(records.len() - recent_len);
    let recent_share = declining_share(recent);
    let earlier_share = declining_share(earlier);
    let worsening = (recent_share - earlier_share).max(0.0);
    let score = (0.7 * recent_share + 0.3 * worsening).clamp(0.0, 1.0);
    let level = if score >= 0.6 {
        RiskLevel::High
    } else if score >= 0.3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    DeclineRisk {
        recent_share,
        earlier_share,
        score,
        level,
    }
}

fn stability(records: &[MoodRecord]) -> f64 {
    if records.len() < 2 {
        return 1.0;
    }
    let same = records
        .windows(2)
        .filter(|pair| pair[0].mood == pair[1].mood)
        .count();
    same as f64 / (records.len() - 1) as f64
}

fn likely_next(records: &[MoodRecord]) -> Option<Mood> {
    let last = records.last()?.mood;
    let successors = count_in_order(
        records
            .windows(2)
            .filter(|pair| pair[0].mood == last)
            .map(|pair| pair[1].mood),
    );
    most_frequent(&successors).map(|(mood, _)| mood)
}

fn pattern_recommendations(
    dominant: Mood,
    stability_score: f64,
    risk: &DeclineRisk,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if risk.level == RiskLevel::High {
        recommendations.push(
            "Recent days lean towards struggling; plan lighter days and protect your breaks"
                .to_string(),
        );
    }
    if stability_score < 0.4 {
        recommendations
            .push("Your mood shifts often; a steadier daily routine can even it out".to_string());
    }
    match dominant {
        Mood::Motivated | Mood::Focused | Mood::Celebrating => recommendations.push(format!(
            "Your most common state is {dominant}; keep the habits that support it"
        )),
        Mood::Struggling | Mood::Overwhelmed => recommendations.push(format!(
            "Most check-ins show you {dominant}; break big tasks into smaller steps"
        )),
        Mood::Returning | Mood::Neutral => {}
    }
    recommendations.truncate(3);
    recommendations
}

/// Analyze observations given oldest first.
pub fn analyze_history(records: &[MoodRecord], period_days: u32, min_samples: usize) -> HistoryReport {
    let required = min_samples.max(2);
    if records.len() < required {
        return HistoryReport::InsufficientData {
            period_days,
            samples: records.len(),
            required,
        };
    }

    let total = records.len() as f64;
    let mut distribution: Vec<MoodShare> = count_in_order(records.iter().map(|r| r.mood))
        .into_iter()
        .map(|(mood, count)| MoodShare {
            mood,
            count,
            share: count as f64 / total,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.mood.cmp(&b.mood)));
    let dominant_mood = distribution
        .first()
        .map(|share| share.mood)
        .unwrap_or(Mood::Neutral);

    let changes: Vec<(Mood, Mood)> = records
        .windows(2)
        .filter(|pair| pair[0].mood != pair[1].mood)
        .map(|pair| (pair[0].mood, pair[1].mood))
        .collect();
    let dominant_transition = most_frequent(&count_in_order(changes.iter().copied())).map(
        |((from_mood, to_mood), count)| TransitionPattern {
            from_mood,
            to_mood,
            count,
        },
    );

    let mut common_triggers: Vec<TriggerCount> = count_in_order(
        changes
            .iter()
            .flat_map(|(from, to)| trigger_factors(*from, *to)),
    )
    .into_iter()
    .map(|(trigger, count)| TriggerCount { trigger, count })
    .collect();
    common_triggers.sort_by(|a, b| b.count.cmp(&a.count));

    let stability_score = stability(records);
    let decline_risk = decline_risk(records);
    let recommendations = pattern_recommendations(dominant_mood, stability_score, &decline_risk);

    HistoryReport::Analyzed(HistoryAnalysis {
        period_days,
        sample_count: records.len(),
        dominant_mood,
        distribution,
        dominant_transition,
        common_triggers,
        stability_score,
        decline_risk,
        likely_next_mood: likely_next(records),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn records(moods: &[Mood]) -> Vec<MoodRecord> {
        let start = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
        moods
            .iter()
            .enumerate()
            .map(|(i, mood)| MoodRecord::new(*mood, start + Duration::hours(12 * i as i64)))
            .collect()
    }

    #[test]
    fn fewer_than_minimum_samples_is_insufficient() {
        let history = records(&[Mood::Focused; 4]);
        let report = analyze_history(&history, 30, 5);
        assert_eq!(
            report,
            HistoryReport::InsufficientData {
                period_days: 30,
                samples: 4,
                required: 5
            }
        );
        assert!(report.analysis().is_none());
        assert!(analyze_history(&[], 30, 5).analysis().is_none());
    }

    #[test]
    fn stable_positive_history() {
        use Mood::*;
        let history = records(&[Focused, Focused, Motivated, Motivated, Motivated, Motivated]);
        let report = analyze_history(&history, 14, 5);
        let analysis = report.analysis().expect("analysis");

        assert_eq!(analysis.sample_count, 6);
        assert_eq!(analysis.dominant_mood, Motivated);
        assert_eq!(analysis.distribution[0].count, 4);
        assert!((analysis.stability_score - 0.8).abs() < 1e-9);
        assert_eq!(
            analysis.dominant_transition,
            Some(TransitionPattern {
                from_mood: Focused,
                to_mood: Motivated,
                count: 1
            })
        );
        assert_eq!(analysis.decline_risk.level, RiskLevel::Low);
        assert_eq!(analysis.likely_next_mood, Some(Motivated));
        assert!(analysis.recommendations[0].contains("motivated"));
    }

    #[test]
    fn declining_recent_third_raises_risk() {
        use Mood::*;
        let history = records(&[
            Motivated, Focused, Motivated, Focused, Motivated, Overwhelmed, Struggling, Struggling,
            Overwhelmed,
        ]);
        let analysis = analyze_history(&history, 30, 5)
            .analysis()
            .cloned()
            .expect("analysis");

        assert_eq!(analysis.decline_risk.recent_share, 1.0);
        assert!(analysis.decline_risk.earlier_share > 0.0);
        assert_eq!(analysis.decline_risk.level, RiskLevel::High);
        assert!(analysis.stability_score < 0.4);
        assert!(analysis
            .common_triggers
            .iter()
            .any(|t| t.trigger == "overdue work piling up"));
        assert!(analysis.recommendations.len() <= 3);
        assert!(analysis.recommendations[0].contains("struggling"));
    }

    #[test]
    fn dominant_transition_prefers_most_frequent_then_earliest() {
        use Mood::*;
        let history = records(&[Focused, Motivated, Focused, Motivated, Struggling, Motivated]);
        let analysis = analyze_history(&history, 30, 5)
            .analysis()
            .cloned()
            .expect("analysis");
        let dominant = analysis.dominant_transition.expect("transition");
        assert_eq!((dominant.from_mood, dominant.to_mood, dominant.count), (Focused, Motivated, 2));
    }

    #[test]
    fn prediction_escalates_declining_current_mood() {
        use Mood::*;
        let calm = analyze_history(&records(&[Focused, Focused, Motivated, Motivated, Motivated]), 14, 5);
        let prediction = MoodPrediction::new(Struggling, 0.9, &calm, 3);
        assert_eq!(prediction.decline_risk.as_ref().map(|r| r.level), Some(RiskLevel::Low));
        assert_eq!(prediction.overall_risk, RiskLevel::Medium);
        assert_eq!(prediction.likely_next_mood, Some(Motivated));
        assert_eq!(prediction.preventive_actions.len(), 2);

        let steady = MoodPrediction::new(Motivated, 0.9, &calm, 3);
        assert_eq!(steady.overall_risk, RiskLevel::Low);
        assert_eq!(
            steady.preventive_actions,
            vec!["Keep your current routine; it is working".to_string()]
        );
    }

    #[test]
    fn prediction_warns_about_likely_decline() {
        use Mood::*;
        let history = records(&[
            Motivated, Focused, Motivated, Focused, Motivated, Overwhelmed, Struggling, Struggling,
            Overwhelmed,
        ]);
        let report = analyze_history(&history, 30, 5);
        let prediction = MoodPrediction::new(Focused, 0.8, &report, 3);
        assert_eq!(prediction.overall_risk, RiskLevel::High);
        assert_eq!(prediction.likely_next_mood, Some(Struggling));
        assert!(prediction.preventive_actions[1].contains("struggling"));
        assert_eq!(prediction.preventive_actions.len(), 3);
    }

    #[test]
    fn prediction_without_history_uses_current_mood_only() {
        let report = analyze_history(&records(&[Mood::Focused; 2]), 7, 5);
        let prediction = MoodPrediction::new(Mood::Overwhelmed, 0.7, &report, 1);
        assert!(prediction.decline_risk.is_none());
        assert!(prediction.likely_next_mood.is_none());
        assert_eq!(prediction.overall_risk, RiskLevel::Medium);
        assert_eq!(prediction.preventive_actions.len(), 1);
    }

    #[test]
    fn report_serializes_with_status_tag() {
        let report = analyze_history(&records(&[Mood::Neutral; 2]), 7, 5);
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["status"], "insufficient_data");
        assert_eq!(value["required"], 5);
    }
}
