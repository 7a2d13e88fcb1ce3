//! Short-lived per-user memoization of classification results.
//!
//! Entries are keyed by user and minute bucket. Each user owns a slot guarded
//! by its own mutex which is held while the result is computed, so concurrent
//! requests for one user collapse into a single computation while other users
//! proceed independently. The map lock itself is only held to look up slots.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};

use crate::log_debug;
use crate::models::MoodResult;

// Cache hits fire on every request; flip off to silence them entirely.
const ENABLE_LOGS: bool = true;

/// Slot count above which expired slots are pruned on insert.
const PRUNE_THRESHOLD: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Computed,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    bucket: i64,
    computed_at: DateTime<Utc>,
    result: MoodResult,
}

impl CacheEntry {
    fn is_fresh(&self, bucket: i64, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.bucket == bucket && now - self.computed_at < ttl
    }
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

struct CacheState {
    slots: Mutex<HashMap<String, Slot>>,
    ttl: Duration,
}

pub struct ResultCache {
    inner: Arc<CacheState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Minute-granularity bucket of a timestamp.
pub fn time_bucket(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(60)
}

impl ResultCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            inner: Arc::new(CacheState {
                slots: Mutex::new(HashMap::new()),
                ttl: Duration::seconds(ttl_secs.max(0)),
            }),
        }
    }

    fn slot(&self, user_id: &str) -> Slot {
        let mut slots = lock(&self.inner.slots);
        slots
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    fn existing_slot(&self, user_id: &str) -> Option<Slot> {
        lock(&self.inner.slots).get(user_id).cloned()
    }

    /// Cached result for the user's current bucket, if still fresh.
    ///
    /// Blocks while another caller is computing for the same user.
    pub fn get(&self, user_id: &str, now: DateTime<Utc>) -> Option<MoodResult> {
        let slot = self.existing_slot(user_id)?;
        let guard = lock(&slot);
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(time_bucket(now), now, self.inner.ttl))
            .map(|entry| entry.result.clone())
    }

    /// Return the fresh cached result or compute, store and return a new one.
    pub fn get_or_compute<F>(&self, user_id: &str, now: DateTime<Utc>, compute: F) -> (MoodResult, CacheOutcome)
    where
        F: FnOnce() -> MoodResult,
    {
        let bucket = time_bucket(now);
        let slot = self.slot(user_id);
        let mut guard = lock(&slot);

        if let Some(entry) = guard.as_ref() {
            if entry.is_fresh(bucket, now, self.inner.ttl) {
                log_debug!("Mood cache hit for user {user_id} (bucket {bucket})");
                return (entry.result.clone(), CacheOutcome::Hit);
            }
        }

        let result = compute();
        *guard = Some(CacheEntry {
            bucket,
            computed_at: now,
            result: result.clone(),
        });
        drop(guard);

        if self.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        (result, CacheOutcome::Computed)
    }

    pub fn invalidate(&self, user_id: &str) {
        if let Some(slot) = self.existing_slot(user_id) {
            *lock(&slot) = None;
        }
    }

    /// Drop slots whose entry has expired. Slots busy computing are skipped.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.inner.ttl;
        let mut slots = lock(&self.inner.slots);
        let before = slots.len();
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(entry) => entry
                .as_ref()
                .map_or(false, |entry| now - entry.computed_at < ttl),
            Err(_) => true,
        });
        before - slots.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(30 * 60)
    }
}

impl Clone for ResultCache {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use chrono::TimeZone;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Barrier,
    };
    use std::thread;

    fn result(mood: Mood) -> MoodResult {
        MoodResult {
            mood,
            ..MoodResult::fallback()
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 10, 15, 5).unwrap()
    }

    #[test]
    fn second_call_in_same_minute_is_a_hit() {
        let cache = ResultCache::default();
        let (_, first) = cache.get_or_compute("u1", base(), || result(Mood::Focused));
        let (cached, second) =
            cache.get_or_compute("u1", base() + Duration::seconds(20), || result(Mood::Struggling));
        assert_eq!(first, CacheOutcome::Computed);
        assert_eq!(second, CacheOutcome::Hit);
        assert_eq!(cached.mood, Mood::Focused);
    }

    #[test]
    fn new_minute_supersedes_old_entry() {
        let cache = ResultCache::default();
        cache.get_or_compute("u1", base(), || result(Mood::Focused));
        let later = base() + Duration::seconds(60);
        let (fresh, outcome) = cache.get_or_compute("u1", later, || result(Mood::Motivated));
        assert_eq!(outcome, CacheOutcome::Computed);
        assert_eq!(fresh.mood, Mood::Motivated);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("u1", base()).is_none());
    }

    #[test]
    fn entries_past_ttl_are_expired_even_in_matching_bucket() {
        let cache = ResultCache::new(10);
        cache.get_or_compute("u1", base(), || result(Mood::Focused));
        assert!(cache.get("u1", base() + Duration::seconds(5)).is_some());
        assert!(cache.get("u1", base() + Duration::seconds(12)).is_none());
    }

    #[test]
    fn invalidate_forces_recompute() {
        let cache = ResultCache::default();
        cache.get_or_compute("u1", base(), || result(Mood::Focused));
        cache.invalidate("u1");
        let (_, outcome) = cache.get_or_compute("u1", base(), || result(Mood::Focused));
        assert_eq!(outcome, CacheOutcome::Computed);
    }

    #[test]
    fn prune_drops_expired_slots() {
        let cache = ResultCache::new(60);
        cache.get_or_compute("old", base(), || result(Mood::Focused));
        cache.get_or_compute("new", base() + Duration::seconds(90), || result(Mood::Focused));
        let removed = cache.prune(base() + Duration::seconds(100));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new", base() + Duration::seconds(100)).is_some());
    }

    #[test]
    fn concurrent_requests_for_one_user_compute_once() {
        let cache = ResultCache::default();
        let computations = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let computations = Arc::clone(&computations);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_compute("shared", base(), || {
                        computations.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(20));
                        result(Mood::Motivated)
                    })
                })
            })
            .collect();

        let outcomes: Vec<CacheOutcome> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread").1)
            .collect();

        assert_eq!(computations.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcomes.iter().filter(|o| **o == CacheOutcome::Computed).count(),
            1
        );
    }

    #[test]
    fn other_users_are_not_blocked_by_a_slow_computation() {
        let cache = ResultCache::default();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let slow_cache = cache.clone();
        let slow = thread::spawn(move || {
            slow_cache.get_or_compute("slow", base(), move || {
                started_tx.send(()).expect("signal start");
                release_rx
                    .recv_timeout(std::time::Duration::from_secs(5))
                    .expect("released by the other user's computation");
                result(Mood::Focused)
            })
        });

        started_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("slow computation started");
        let (_, outcome) = cache.get_or_compute("fast", base(), || result(Mood::Motivated));
        assert_eq!(outcome, CacheOutcome::Computed);
        release_tx.send(()).expect("release");

        let (slow_result, _) = slow.join().expect("slow thread");
        assert_eq!(slow_result.mood, Mood::Focused);
    }
}
