//! Personality adaptation driven by the classified mood.
//!
//! This module never scores moods itself; it only reads a [`MoodResult`].

use serde::Serialize;

use crate::models::{Mood, MoodResult};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Supportive,
    Direct,
    Calming,
    Enthusiastic,
    Welcoming,
    Friendly,
}

impl Tone {
    pub fn for_mood(mood: Mood) -> Self {
        match mood {
            Mood::Motivated => Tone::Casual,
            Mood::Struggling => Tone::Supportive,
            Mood::Focused => Tone::Direct,
            Mood::Overwhelmed => Tone::Calming,
            Mood::Celebrating => Tone::Enthusiastic,
            Mood::Returning => Tone::Welcoming,
            Mood::Neutral => Tone::Friendly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Casual => "casual",
            Tone::Supportive => "supportive",
            Tone::Direct => "direct",
            Tone::Calming => "calming",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Welcoming => "welcoming",
            Tone::Friendly => "friendly",
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            Tone::Casual => "informal and upbeat, with varied sentence length",
            Tone::Supportive => "warm and encouraging, at a moderate pace",
            Tone::Direct => "brief and precise, avoiding digressions",
            Tone::Calming => "soft and unhurried, simplifying wherever possible",
            Tone::Enthusiastic => "energetic and festive",
            Tone::Welcoming => "warm and inclusive, without pressure",
            Tone::Friendly => "friendly and neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PersonalityTraits {
    pub friendliness: f64,
    pub supportiveness: f64,
    pub enthusiasm: f64,
    pub directness: f64,
    pub empathy: f64,
    pub motivation: f64,
    pub intelligence: f64,
    pub humor: f64,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            friendliness: 0.9,
            supportiveness: 0.8,
            enthusiasm: 0.7,
            directness: 0.6,
            empathy: 0.9,
            motivation: 0.8,
            intelligence: 0.9,
            humor: 0.6,
        }
    }
}

impl PersonalityTraits {
    pub fn adapted_to(mood: Mood) -> Self {
        let base = Self::default();
        match mood {
            Mood::Motivated => Self {
                enthusiasm: 0.9,
                directness: 0.8,
                humor: 0.8,
                ..base
            },
            Mood::Struggling => Self {
                supportiveness: 1.0,
                empathy: 1.0,
                directness: 0.3,
                ..base
            },
            Mood::Focused => Self {
                directness: 0.9,
                enthusiasm: 0.4,
                friendliness: 0.6,
                ..base
            },
            Mood::Overwhelmed => Self {
                empathy: 1.0,
                supportiveness: 1.0,
                enthusiasm: 0.3,
                ..base
            },
            Mood::Celebrating => Self {
                enthusiasm: 1.0,
                humor: 0.9,
                friendliness: 1.0,
                ..base
            },
            Mood::Returning => Self {
                friendliness: 1.0,
                supportiveness: 0.9,
                empathy: 0.8,
                ..base
            },
            Mood::Neutral => base,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonalityAdaptation {
    pub mood: Mood,
    pub confidence: f64,
    pub tone: Tone,
    pub traits: PersonalityTraits,
    pub adaptation_applied: bool,
    pub contributing_factors: Vec<String>,
    /// One-sentence instruction for the response generator.
    pub style_directive: String,
}

/// Derive the assistant's personality for a classification result.
pub fn adapt_personality(result: &MoodResult, low_confidence_threshold: f64) -> PersonalityAdaptation {
    let tone = if result.confidence < low_confidence_threshold {
        Tone::Supportive
    } else {
        Tone::for_mood(result.mood)
    };

    let mut contributing_factors: Vec<String> = result
        .insights
        .iter()
        .skip(1)
        .filter(|insight| result.indicators.iter().any(|i| &i.description == *insight))
        .cloned()
        .collect();
    if contributing_factors.is_empty() {
        let mut ranked: Vec<_> = result.indicators.iter().collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        contributing_factors = ranked.iter().map(|i| i.description.clone()).collect();
    }
    contributing_factors.truncate(3);

    let style_directive = format!(
        "The user seems {} right now; respond in a {} tone, {}.",
        result.mood,
        tone.as_str(),
        tone.guidance()
    );

    PersonalityAdaptation {
        mood: result.mood,
        confidence: result.confidence,
        tone,
        traits: PersonalityTraits::adapted_to(result.mood),
        adaptation_applied: result.mood != Mood::Neutral,
        contributing_factors,
        style_directive,
    }
}
