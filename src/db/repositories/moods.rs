use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    helpers::{format_datetime, parse_datetime, parse_mood},
    Database,
};
use crate::models::{MoodRecord, MoodSnapshotRecord};
use crate::mood::store::MoodStore;

fn row_to_record(row: &Row) -> Result<MoodRecord> {
    let mood: String = row.get("mood")?;
    let recorded_at: String = row.get("recorded_at")?;

    Ok(MoodRecord {
        mood: parse_mood(&mood)?,
        timestamp: parse_datetime(&recorded_at, "recorded_at")?,
    })
}

#[async_trait]
impl MoodStore for Database {
    async fn read_last_mood(&self, user_id: &str) -> Result<Option<MoodRecord>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT mood, recorded_at
                 FROM mood_snapshots
                 WHERE user_id = ?1
                 ORDER BY recorded_at DESC
                 LIMIT 1",
            )?;

            let record = stmt
                .query_row(params![user_id], |row| Ok(row_to_record(row)))
                .optional()?
                .transpose()?;
            Ok(record)
        })
        .await
    }

    async fn write_mood_snapshot(&self, record: &MoodSnapshotRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO mood_snapshots (id, user_id, mood, confidence, indicators, recorded_at, rule_table_version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    Uuid::new_v4().to_string(),
                    record.user_id,
                    record.mood.as_str(),
                    record.confidence,
                    record.indicators,
                    format_datetime(record.recorded_at),
                    record.rule_table_version,
                ],
            )
            .with_context(|| "failed to insert mood snapshot")?;
            Ok(())
        })
        .await
    }

    async fn read_mood_history(
        &self,
        user_id: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<MoodRecord>> {
        let user_id = user_id.to_string();
        let since = format_datetime(now - Duration::days(i64::from(days)));
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT mood, recorded_at
                 FROM mood_snapshots
                 WHERE user_id = ?1 AND recorded_at >= ?2
                 ORDER BY recorded_at DESC",
            )?;

            let mut rows = stmt.query(params![user_id, since])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(row_to_record(row)?);
            }
            Ok(records)
        })
        .await
    }
}
