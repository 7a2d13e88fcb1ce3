use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::models::{BehaviorSnapshot, MoodResult, MoodSnapshotRecord};
use crate::mood::{
    cache::{CacheOutcome, ResultCache},
    config::EngineConfig,
    engine::MoodEngine,
    history::{analyze_history, HistoryReport, MoodPrediction},
    insights::MAX_ITEMS,
    personality::{adapt_personality, PersonalityAdaptation},
    store::MoodStore,
};

/// Window used by [`MoodDetector::predict`].
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Classification service: engine + result cache + persistence.
pub struct MoodDetector<S> {
    engine: MoodEngine,
    cache: ResultCache,
    store: S,
}

impl<S: MoodStore> MoodDetector<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        let cache = ResultCache::new(config.cache_ttl_secs);
        Self {
            engine: MoodEngine::new(config),
            cache,
            store,
        }
    }

    /// Share one cache between several detectors.
    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// Classify the user's current mood.
    ///
    /// Served from the cache within the same minute. Fresh results are
    /// persisted best-effort; a failed write never fails the call.
    pub async fn detect_current_mood(&self, snapshot: &BehaviorSnapshot, now: DateTime<Utc>) -> MoodResult {
        let user_id = snapshot.user_id.as_str();
        if user_id.is_empty() {
            warn!("Classifying snapshot without a user id; result is not cached or persisted");
            return self.engine.classify(snapshot, now, None);
        }

        if let Some(cached) = self.cache.get(user_id, now) {
            debug!("Serving cached mood for user {user_id}");
            return cached;
        }

        let previous = match self.store.read_last_mood(user_id).await {
            Ok(previous) => previous,
            Err(err) => {
                warn!("Failed to read last mood for user {user_id}, treating as first classification: {err:#}");
                None
            }
        };

        let (result, outcome) = self.cache.get_or_compute(user_id, now, || {
            self.engine.classify(snapshot, now, previous.as_ref())
        });

        if outcome == CacheOutcome::Computed {
            info!(
                "Mood for user {user_id}: {} ({:.2})",
                result.mood, result.confidence
            );
            let record = MoodSnapshotRecord::from_result(user_id, &result, now);
            if let Err(err) = self.store.write_mood_snapshot(&record).await {
                error!("Failed to persist mood snapshot for user {user_id}: {err:#}");
            }
        }

        result
    }

    /// Drop any cached result for the user and classify again.
    pub async fn refresh_mood(&self, snapshot: &BehaviorSnapshot, now: DateTime<Utc>) -> MoodResult {
        self.cache.invalidate(&snapshot.user_id);
        self.detect_current_mood(snapshot, now).await
    }

    pub async fn adapt_personality(
        &self,
        snapshot: &BehaviorSnapshot,
        now: DateTime<Utc>,
    ) -> PersonalityAdaptation {
        let result = self.detect_current_mood(snapshot, now).await;
        adapt_personality(&result, self.config().low_confidence_tone_threshold)
    }

    /// Pattern report over the last `days` days, clamped to the configured window.
    pub async fn analyze_history(&self, user_id: &str, days: u32, now: DateTime<Utc>) -> Result<HistoryReport> {
        let config = self.config();
        let days = config.clamp_history_days(days);

        let mut records = self
            .store
            .read_mood_history(user_id, days, now)
            .await
            .with_context(|| format!("failed to read mood history for user {user_id}"))?;
        records.reverse();

        let report = analyze_history(&records, days, config.history_min_samples);
        if let HistoryReport::InsufficientData { samples, required, .. } = &report {
            info!("Insufficient mood history for user {user_id}: {samples} of {required} samples");
        }
        Ok(report)
    }

    /// Current mood plus the outlook from the default history window.
    pub async fn predict(&self, snapshot: &BehaviorSnapshot, now: DateTime<Utc>) -> Result<MoodPrediction> {
        let current = self.detect_current_mood(snapshot, now).await;
        let report = self
            .analyze_history(&snapshot.user_id, DEFAULT_HISTORY_DAYS, now)
            .await?;
        Ok(MoodPrediction::new(
            current.mood,
            current.confidence,
            &report,
            self.config().max_recommendations.min(MAX_ITEMS),
        ))
    }
}
