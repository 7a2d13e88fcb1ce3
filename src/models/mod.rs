pub mod mood;
pub mod session;
pub mod snapshot;

pub use mood::{
    Indicator, IndicatorKind, IndicatorValue, Mood, MoodRecord, MoodResult, MoodScores,
    MoodSnapshotRecord, MoodTransition,
};
pub use session::{FocusSession, SessionStatus};
pub use snapshot::{BehaviorSnapshot, DailyActivity, TaskStats};
