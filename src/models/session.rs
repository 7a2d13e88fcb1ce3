use serde::{Deserialize, Serialize};

/// Sessions without a reported status count as not completed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Cancelled,
    #[default]
    Interrupted,
}

/// One focus (pomodoro) session started today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    /// Length of the session in minutes.
    #[serde(default)]
    pub duration_minutes: f64,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub task_title: Option<String>,
}

impl FocusSession {
    pub fn completed(duration_minutes: f64, task_title: Option<&str>) -> Self {
        Self {
            duration_minutes,
            status: SessionStatus::Completed,
            task_title: task_title.map(str::to_string),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}
