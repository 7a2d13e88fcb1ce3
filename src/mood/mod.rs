pub mod cache;
pub mod config;
pub mod detector;
pub mod engine;
pub mod history;
pub mod indicators;
pub mod insights;
pub mod personality;
pub mod rules;
pub mod scoring;
pub mod store;
pub mod transition;

pub use cache::{CacheOutcome, ResultCache};
pub use config::EngineConfig;
pub use detector::MoodDetector;
pub use engine::MoodEngine;
pub use history::{HistoryAnalysis, HistoryReport, MoodPrediction, RiskLevel};
pub use personality::{PersonalityAdaptation, PersonalityTraits, Tone};
pub use store::MoodStore;
