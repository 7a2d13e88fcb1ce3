use crate::models::{Indicator, IndicatorKind, Mood, MoodTransition};

/// Upper bound on insights and on recommendations per result.
pub const MAX_ITEMS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guidance {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

fn headline(mood: Mood) -> &'static str {
    match mood {
        Mood::Motivated => "You are in an excellent productive stretch",
        Mood::Struggling => "Your routine is running into some friction",
        Mood::Focused => "Your focus quality is high right now",
        Mood::Overwhelmed => "There are signs of overload in your workload",
        Mood::Celebrating => "Great results lately, worth celebrating",
        Mood::Returning => "Welcome back to your routine",
        Mood::Neutral => "Still learning your working patterns",
    }
}

fn mood_recommendations(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Motivated => &[
            "Use this momentum on your most challenging task",
            "Consider raising your daily goal",
        ],
        Mood::Struggling => &[
            "Start with a small task to rebuild momentum",
            "Lower today's expectations for a while",
        ],
        Mood::Focused => &[
            "Keep the current rhythm going",
            "Silence interruptions while the focus lasts",
        ],
        Mood::Overwhelmed => &[
            "Pick only the three most important tasks for today",
            "Delegate or postpone what is not critical",
        ],
        Mood::Celebrating => &[
            "Set your next challenging goal",
            "Share the win to keep motivation high",
        ],
        Mood::Returning => &[
            "Ease back in with a simple task",
            "Focus on re-establishing a consistent routine",
        ],
        Mood::Neutral => &["Keep logging tasks and focus sessions so patterns can emerge"],
    }
}

fn numeric(indicators: &[Indicator], kind: IndicatorKind) -> Option<f64> {
    indicators
        .iter()
        .find(|indicator| indicator.kind == kind)
        .and_then(|indicator| indicator.value.as_f64())
}

/// One recommendation derived from the indicators, when a clear lever exists.
fn targeted_recommendation(mood: Mood, indicators: &[Indicator]) -> Option<String> {
    match mood {
        Mood::Struggling | Mood::Overwhelmed => {
            let overdue = numeric(indicators, IndicatorKind::OverdueTasks)?;
            (overdue >= 1.0).then(|| {
                if overdue == 1.0 {
                    "Reschedule or close out the overdue task first".to_string()
                } else {
                    format!("Reschedule or close out the {overdue:.0} overdue tasks first")
                }
            })
        }
        Mood::Motivated | Mood::Celebrating => {
            let streak = numeric(indicators, IndicatorKind::CurrentStreak)?;
            (streak >= 2.0)
                .then(|| format!("Protect your {streak:.0}-day streak with one more session today"))
        }
        Mood::Focused => {
            let in_window = indicators
                .iter()
                .find(|indicator| indicator.kind == IndicatorKind::InPeakWindow)
                .and_then(|indicator| indicator.value.as_bool())?;
            in_window.then(|| "Reserve the rest of your peak hours for deep work".to_string())
        }
        Mood::Returning | Mood::Neutral => None,
    }
}

/// Highest-weight indicators, preferring those that voted for the mood.
fn salient<'a>(indicators: &'a [Indicator], evidence: &[IndicatorKind]) -> Vec<&'a Indicator> {
    let mut ranked: Vec<&Indicator> = indicators
        .iter()
        .filter(|indicator| evidence.contains(&indicator.kind))
        .collect();
    if ranked.is_empty() {
        ranked = indicators.iter().collect();
    }
    // Stable sort keeps extraction order among equal weights.
    ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    ranked
}

/// Build insight and recommendation strings from static templates.
///
/// Each list is capped at [`MAX_ITEMS`] whatever the configured limits say.
pub fn generate_guidance(
    mood: Mood,
    indicators: &[Indicator],
    evidence: &[IndicatorKind],
    transition: Option<&MoodTransition>,
    max_insights: usize,
    max_recommendations: usize,
) -> Guidance {
    let mut insights = vec![headline(mood).to_string()];
    if let Some(transition) = transition {
        insights.push(format!(
            "Shifted from {} to {}",
            transition.from_mood, transition.to_mood
        ));
    }
    for indicator in salient(indicators, evidence).into_iter().take(2) {
        if !indicator.description.is_empty() {
            insights.push(indicator.description.clone());
        }
    }
    insights.truncate(max_insights.min(MAX_ITEMS));

    let mut recommendations: Vec<String> = mood_recommendations(mood)
        .iter()
        .map(|text| text.to_string())
        .collect();
    if let Some(targeted) = targeted_recommendation(mood, indicators) {
        recommendations.push(targeted);
    }
    recommendations.truncate(max_recommendations.min(MAX_ITEMS));

    Guidance {
        insights,
        recommendations,
    }
}
