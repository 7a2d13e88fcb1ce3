//! Behavioral mood classification and personality adaptation.
//!
//! [`MoodEngine`] is the pure pipeline from a [`BehaviorSnapshot`] to a
//! [`MoodResult`]; [`MoodDetector`] wraps it with a per-user result cache and
//! a [`MoodStore`] for transition tracking and history.

pub mod db;
pub mod models;
pub mod mood;
pub mod settings;
pub mod utils;

pub use db::Database;
pub use models::{BehaviorSnapshot, Mood, MoodResult};
pub use mood::{EngineConfig, MoodDetector, MoodEngine, MoodStore};
