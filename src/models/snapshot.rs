use serde::{Deserialize, Serialize};

use super::session::FocusSession;

/// Aggregate task counts for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStats {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub overdue: u32,
    pub in_progress: u32,
}

/// Per-day created/completed counts from the rolling activity log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyActivity {
    pub tasks_created: u32,
    pub tasks_completed: u32,
}

impl DailyActivity {
    pub fn new(tasks_created: u32, tasks_completed: u32) -> Self {
        Self {
            tasks_created,
            tasks_completed,
        }
    }
}

/// Everything the classifier knows about a user for one call.
///
/// Missing fields deserialize to "no signal": empty logs, zero counts and no
/// peak hour. The caller is responsible for fetching this record and handling
/// lookup failures before the engine ever sees it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSnapshot {
    pub user_id: String,
    pub tasks: TaskStats,
    /// Most recent day first.
    pub activity_log: Vec<DailyActivity>,
    pub current_streak: u32,
    pub today_sessions: Vec<FocusSession>,
    /// Hour of day (0-23) in the user's local clock.
    pub peak_hour: Option<u32>,
    /// Offset of the user's local clock from UTC.
    pub utc_offset_minutes: i32,
}

impl BehaviorSnapshot {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Completed counts can exceed totals in hand-built or stale records;
    /// the ratio is clamped so downstream indicators stay in range.
    pub fn completion_rate(&self) -> Option<f64> {
        if self.tasks.total == 0 {
            return None;
        }
        Some((self.tasks.completed as f64 / self.tasks.total as f64).min(1.0))
    }

    pub fn completed_sessions(&self) -> impl Iterator<Item = &FocusSession> {
        self.today_sessions.iter().filter(|s| s.is_completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;

    #[test]
    fn sparse_json_fills_missing_fields_with_no_signal() {
        let snapshot: BehaviorSnapshot = serde_json::from_str(
            r#"{"user_id":"u1","tasks":{"total":4,"completed":2},
                "today_sessions":[{"duration_minutes":25.0,"task_title":"Report"}]}"#,
        )
        .expect("sparse snapshot parses");

        assert_eq!(snapshot.tasks.overdue, 0);
        assert_eq!(snapshot.completion_rate(), Some(0.5));
        assert!(snapshot.activity_log.is_empty());
        assert_eq!(snapshot.peak_hour, None);

        let session = &snapshot.today_sessions[0];
        assert_eq!(session.status, SessionStatus::Interrupted);
        assert_eq!(session.task_title.as_deref(), Some("Report"));
        assert_eq!(snapshot.completed_sessions().count(), 0);
    }

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        let snapshot: BehaviorSnapshot = serde_json::from_str("{}").expect("parses");
        assert!(snapshot.user_id.is_empty());
        assert_eq!(snapshot.completion_rate(), None);
        assert!(snapshot.today_sessions.is_empty());
    }
}
