use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{MoodRecord, MoodSnapshotRecord};

/// Persistence the detector depends on. Implemented by [`crate::db::Database`].
#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Most recently persisted mood for the user, if any.
    async fn read_last_mood(&self, user_id: &str) -> Result<Option<MoodRecord>>;

    async fn write_mood_snapshot(&self, record: &MoodSnapshotRecord) -> Result<()>;

    /// Observations from the last `days` days before `now`, most recent first.
    async fn read_mood_history(
        &self,
        user_id: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<MoodRecord>>;
}
