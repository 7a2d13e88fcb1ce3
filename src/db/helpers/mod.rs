use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::Mood;

/// Timestamps are stored as RFC3339 UTC with millisecond precision so that
/// lexicographic order in SQLite matches chronological order.
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_mood(value: &str) -> Result<Mood> {
    Mood::parse(value).with_context(|| format!("unknown mood {value} in mood_snapshots"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formatted_timestamps_sort_chronologically() {
        let early = Utc.with_ymd_and_hms(2026, 1, 9, 23, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(format_datetime(early), "2026-01-09T23:59:59.000Z");
        assert!(format_datetime(early) < format_datetime(late));
        assert_eq!(parse_datetime(&format_datetime(late), "recorded_at").unwrap(), late);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(parse_datetime("yesterday", "recorded_at").is_err());
        assert!(parse_mood("grumpy").is_err());
        assert_eq!(parse_mood("focused").unwrap(), Mood::Focused);
    }
}
