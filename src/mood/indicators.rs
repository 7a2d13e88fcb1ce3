use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::models::{BehaviorSnapshot, Indicator, IndicatorKind};

/// Days of the activity log considered "recent" for the completion ratio.
const RECENT_WINDOW_DAYS: usize = 3;

/// Pending tasks at which overwhelm saturates.
const OVERWHELM_SATURATION: f64 = 10.0;

/// Hour of `now` on the user's local clock.
pub fn local_hour(snapshot: &BehaviorSnapshot, now: DateTime<Utc>) -> u32 {
    match FixedOffset::east_opt(snapshot.utc_offset_minutes.saturating_mul(60)) {
        Some(offset) => now.with_timezone(&offset).hour(),
        None => now.hour(),
    }
}

/// Compute the indicator vocabulary from a snapshot.
///
/// Indicators without a signal in the snapshot are omitted rather than
/// defaulted. Output order is fixed.
pub fn extract_indicators(snapshot: &BehaviorSnapshot, current_hour: u32) -> Vec<Indicator> {
    let mut indicators = Vec::with_capacity(13);
    let tasks = &snapshot.tasks;

    if let Some(rate) = snapshot.completion_rate() {
        indicators.push(Indicator::number(
            IndicatorKind::CompletionRate,
            rate,
            format!("Completion rate: {:.0}%", rate * 100.0),
        ));
    }

    indicators.push(Indicator::number(
        IndicatorKind::OverdueTasks,
        tasks.overdue as f64,
        match tasks.overdue {
            0 => "No overdue tasks".to_string(),
            1 => "1 overdue task".to_string(),
            n => format!("{n} overdue tasks"),
        },
    ));

    indicators.push(Indicator::number(
        IndicatorKind::CurrentStreak,
        snapshot.current_streak as f64,
        format!("{}-day streak", snapshot.current_streak),
    ));

    let completed_sessions = snapshot.completed_sessions().count();
    indicators.push(Indicator::number(
        IndicatorKind::TodayPomodoros,
        completed_sessions as f64,
        format!("{completed_sessions} focus sessions completed today"),
    ));

    if let [today, yesterday, ..] = snapshot.activity_log.as_slice() {
        let trend = today.tasks_completed as f64 - yesterday.tasks_completed as f64;
        indicators.push(Indicator::number(
            IndicatorKind::ActivityTrend,
            trend,
            format!("Activity trend: {trend:+}"),
        ));
    }

    if completed_sessions > 0 {
        let total_minutes: f64 = snapshot
            .completed_sessions()
            .map(|session| session.duration_minutes.max(0.0))
            .sum();
        let average = total_minutes / completed_sessions as f64;
        indicators.push(Indicator::number(
            IndicatorKind::FocusQuality,
            average,
            format!("Average focus session: {average:.1} min"),
        ));
    }

    let overwhelm = (tasks.pending as f64 / OVERWHELM_SATURATION).min(1.0);
    indicators.push(Indicator::number(
        IndicatorKind::OverwhelmLevel,
        overwhelm,
        format!("Workload pressure: {:.0}%", overwhelm * 100.0),
    ));

    if let Some(peak_hour) = snapshot.peak_hour.filter(|hour| *hour < 24) {
        let distance = hour_distance(current_hour, peak_hour);
        let alignment = 1.0 - distance as f64 / 12.0;
        indicators.push(Indicator::number(
            IndicatorKind::TimingAlignment,
            alignment,
            format!("Peak-hour alignment: {:.0}%", alignment * 100.0),
        ));

        let in_window = distance <= 1;
        indicators.push(Indicator::flag(
            IndicatorKind::InPeakWindow,
            in_window,
            if in_window {
                "Working inside peak hours".to_string()
            } else {
                "Working outside peak hours".to_string()
            },
        ));
    }

    if !snapshot.today_sessions.is_empty() {
        let abandoned = snapshot.today_sessions.len() - completed_sessions;
        indicators.push(Indicator::number(
            IndicatorKind::IncompleteSessions,
            abandoned as f64,
            format!("{abandoned} focus sessions left unfinished today"),
        ));
    }

    let titles: HashSet<&str> = snapshot
        .today_sessions
        .iter()
        .filter_map(|session| session.task_title.as_deref())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .collect();
    if !titles.is_empty() {
        indicators.push(Indicator::number(
            IndicatorKind::TaskVariety,
            titles.len() as f64,
            format!("{} distinct tasks in focus today", titles.len()),
        ));
    }

    let log = &snapshot.activity_log;
    if log.iter().any(|day| day.tasks_completed > 0) {
        let inactive = log.iter().take_while(|day| day.tasks_completed == 0).count();
        indicators.push(Indicator::number(
            IndicatorKind::InactiveDays,
            inactive as f64,
            format!("{inactive} days since the last completed task"),
        ));
    }

    let (created, completed) = log
        .iter()
        .take(RECENT_WINDOW_DAYS)
        .fold((0u64, 0u64), |(created, completed), day| {
            (
                created + day.tasks_created as u64,
                completed + day.tasks_completed as u64,
            )
        });
    if created > 0 {
        let ratio = completed as f64 / created as f64;
        indicators.push(Indicator::number(
            IndicatorKind::RecentCompletionRatio,
            ratio,
            format!("Recent completion ratio: {:.0}%", ratio * 100.0),
        ));
    }

    indicators
}

/// Distance between two hours on a 24h clock; 23 and 0 are one hour apart.
fn hour_distance(a: u32, b: u32) -> u32 {
    let diff = a.abs_diff(b) % 24;
    diff.min(24 - diff)
}
