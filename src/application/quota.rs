//! Daily per-caller quota enforcement.
//!
//! The tracker keeps no state of its own. Every decision is made against the
//! durable store through its conditional increment, so any number of
//! processes can share one store.
//!
//! Two policies shape the behaviour:
//!
//! - **Fail open**: a store fault never blocks a caller. The fault is logged
//!   and the request is allowed.
//! - **Two-step rollover**: when the stored day is stale the increment is
//!   rejected by its precondition and the record is overwritten with
//!   `count = 1` in a separate write. Concurrent first requests of a day can
//!   each perform that reset, so the first few requests of a day may be
//!   under-counted.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{ConditionalIncrement, QuotaDecision, QuotaRecord, UsageSnapshot, UNKNOWN_CLIENT};
use crate::infrastructure::config::quota::QuotaConfig;
use crate::port::outbound::QuotaStore;

/// Enforces "at most `limit` allowed operations per caller per UTC day".
pub struct QuotaTracker<S> {
    store: Arc<S>,
    bypass: bool,
}

impl<S> Clone for QuotaTracker<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bypass: self.bypass,
        }
    }
}

impl<S: QuotaStore> QuotaTracker<S> {
    /// Create a tracker over `store` using the bypass flag from `config`.
    #[must_use]
    pub fn new(store: Arc<S>, config: &QuotaConfig) -> Self {
        Self {
            store,
            bypass: config.skip,
        }
    }

    /// Record one attempt for `key` on `today` and decide whether it may proceed.
    ///
    /// Anonymous callers and a set bypass flag are always allowed without
    /// touching the store.
    pub async fn check_and_increment(&self, key: &str, limit: u32, today: &str) -> QuotaDecision {
        if key == UNKNOWN_CLIENT || self.bypass {
            debug!(client = key, bypass = self.bypass, "Rate limiting skipped");
            return QuotaDecision::Allowed;
        }

        match self.store.increment_if_current(key, today).await {
            Ok(ConditionalIncrement::Applied(count)) => {
                info!(client = key, count, limit, "Rate limit check");
                if count > limit {
                    QuotaDecision::exceeded(limit)
                } else {
                    QuotaDecision::Allowed
                }
            }
            Ok(ConditionalIncrement::StaleDate) => {
                info!(client = key, date = today, "New day detected, resetting counter");
                self.reset_for_new_day(key, today).await
            }
            Err(e) => {
                error!(client = key, error = %e, "Quota store error during rate limit check");
                QuotaDecision::Allowed
            }
        }
    }

    async fn reset_for_new_day(&self, key: &str, today: &str) -> QuotaDecision {
        let record = QuotaRecord::new(key, today, 1);
        match self.store.overwrite(&record).await {
            Ok(()) => info!(client = key, date = today, "Counter reset"),
            Err(e) => error!(client = key, error = %e, "Error resetting counter"),
        }
        QuotaDecision::Allowed
    }

    /// Snapshot of `key`'s usage on `today` without modifying the store.
    ///
    /// A missing or stale record reads as zero usage. A read failure yields the
    /// same zero snapshot with its `error` set.
    pub async fn current_usage(&self, key: &str, today: &str, limit: u32) -> UsageSnapshot {
        match self.store.get(key).await {
            Ok(record) => {
                let used = record.map_or(0, |r| r.effective_count(today));
                UsageSnapshot::new(key, today, used, limit)
            }
            Err(e) => {
                error!(client = key, error = %e, "Error getting usage");
                UsageSnapshot::unavailable(key, today, limit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::store::{CountingStore, FailingStore, StaleRejectingStore};

    const DAY: &str = "2024-05-01";
    const NEXT_DAY: &str = "2024-05-02";

    fn tracker<S: QuotaStore>(store: Arc<S>) -> QuotaTracker<S> {
        QuotaTracker::new(store, &QuotaConfig::default())
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let tracker = tracker(Arc::new(CountingStore::default()));
        for _ in 0..3 {
            assert!(tracker.check_and_increment("1.2.3.4", 3, DAY).await.is_allowed());
        }
        let decision = tracker.check_and_increment("1.2.3.4", 3, DAY).await;
        assert!(matches!(decision, QuotaDecision::Denied(ref m) if m.contains('3')));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let tracker = tracker(Arc::new(CountingStore::default()));
        assert!(tracker.check_and_increment("a", 1, DAY).await.is_allowed());
        assert!(!tracker.check_and_increment("a", 1, DAY).await.is_allowed());
        assert!(tracker.check_and_increment("b", 1, DAY).await.is_allowed());
    }

    #[tokio::test]
    async fn new_day_resets_to_one() {
        let store = Arc::new(CountingStore::default());
        let tracker = tracker(Arc::clone(&store));
        for _ in 0..5 {
            tracker.check_and_increment("k", 2, DAY).await;
        }
        assert!(tracker.check_and_increment("k", 2, NEXT_DAY).await.is_allowed());
        assert_eq!(store.record("k").map(|r| (r.date, r.count)), Some((NEXT_DAY.to_string(), 1)));
        assert_eq!(store.overwrites(), 1);
    }

    #[tokio::test]
    async fn unknown_client_never_touches_store() {
        let store = Arc::new(CountingStore::default());
        let tracker = tracker(Arc::clone(&store));
        for _ in 0..10 {
            assert!(tracker.check_and_increment(UNKNOWN_CLIENT, 1, DAY).await.is_allowed());
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn bypass_flag_never_touches_store() {
        let store = Arc::new(CountingStore::default());
        let config = QuotaConfig {
            skip: true,
            ..QuotaConfig::default()
        };
        let tracker = QuotaTracker::new(Arc::clone(&store), &config);
        for _ in 0..10 {
            assert!(tracker.check_and_increment("1.2.3.4", 1, DAY).await.is_allowed());
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn failed_rollover_write_still_allows() {
        let store = Arc::new(StaleRejectingStore::default());
        let tracker = tracker(Arc::clone(&store));
        assert!(tracker.check_and_increment("k", 1, DAY).await.is_allowed());
        assert!(tracker.check_and_increment("k", 1, DAY).await.is_allowed());
        assert_eq!(store.overwrite_attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn store_failure_fails_open() {
        let tracker = tracker(Arc::new(FailingStore));
        assert!(tracker.check_and_increment("1.2.3.4", 1, DAY).await.is_allowed());
        assert!(tracker.check_and_increment("1.2.3.4", 1, DAY).await.is_allowed());
    }

    #[tokio::test]
    async fn usage_snapshot_is_read_only() {
        let store = Arc::new(CountingStore::default());
        let tracker = tracker(Arc::clone(&store));
        tracker.check_and_increment("k", 10, DAY).await;
        tracker.check_and_increment("k", 10, DAY).await;

        let before = store.writes();
        let usage = tracker.current_usage("k", DAY, 10).await;
        assert_eq!((usage.used, usage.remaining, usage.limit), (2, 8, 10));
        assert_eq!(store.writes(), before);

        let stale = tracker.current_usage("k", NEXT_DAY, 10).await;
        assert_eq!((stale.used, stale.remaining), (0, 10));
        assert!(stale.error.is_none());
    }

    #[tokio::test]
    async fn usage_read_failure_is_flagged() {
        let tracker = tracker(Arc::new(FailingStore));
        let usage = tracker.current_usage("k", DAY, 50).await;
        assert_eq!((usage.used, usage.remaining), (0, 50));
        assert!(usage.error.is_some());
    }
}
