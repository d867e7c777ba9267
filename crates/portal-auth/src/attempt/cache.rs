//! In-memory login attempt cache backed by a sharded concurrent map.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use portal_core::config::auth::AuthConfig;
use portal_core::result::AppResult;

/// Failed-attempt counter for one username.
#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    /// Consecutive failures since the record was created.
    count: u32,
    /// When the most recent failure was recorded.
    last_failure: DateTime<Utc>,
}

/// Tracks consecutive failed logins per username.
///
/// Each username moves through `NoRecord -> Counting(n) -> Exceeded` as
/// failures accrue, and back to `NoRecord` on [`evict`](Self::evict) or
/// once the attempt window has passed since the last failure. The map's
/// entry API holds the shard lock for the whole read-modify-write, so
/// concurrent failures for one username never lose an increment.
///
/// The cache knows nothing about the account's locked flag; the
/// coordinator translates `Exceeded` into a directory update.
#[derive(Debug, Clone)]
pub struct LoginAttemptCache {
    /// Username → attempt record.
    entries: Arc<DashMap<String, AttemptRecord>>,
    /// Failures at which a username counts as exceeded.
    max_attempts: u32,
    /// Lifetime of a record after its last failure; `None` keeps it
    /// until evicted.
    window: Option<Duration>,
}

impl LoginAttemptCache {
    /// Creates a cache with the given threshold and record lifetime.
    ///
    /// A threshold of zero is raised to one.
    pub fn new(max_attempts: u32, window: Option<Duration>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_attempts: max_attempts.max(1),
            window,
        }
    }

    /// Creates a cache from auth configuration.
    ///
    /// Fails with a configuration error if the window is out of range.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        Ok(Self::new(config.max_failed_attempts, config.attempt_window()?))
    }

    /// The configured lockout threshold.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Records a failed attempt and returns the new count.
    pub fn record_failure(&self, username: &str) -> u32 {
        self.record_failure_at(username, Utc::now())
    }

    /// Records a failed attempt as of `now` and returns the new count.
    ///
    /// A record that outlived the window restarts at one.
    pub fn record_failure_at(&self, username: &str, now: DateTime<Utc>) -> u32 {
        let mut record = self
            .entries
            .entry(username.to_string())
            .or_insert(AttemptRecord {
                count: 0,
                last_failure: now,
            });

        if self.is_stale(&record, now) {
            record.count = 0;
        }
        record.count = record.count.saturating_add(1);
        record.last_failure = now;

        debug!(username = %username, attempts = record.count, "Recorded failed login attempt");
        record.count
    }

    /// Returns the current failure count, zero if there is no live record.
    pub fn attempts(&self, username: &str) -> u32 {
        self.attempts_at(username, Utc::now())
    }

    /// Returns the failure count as of `now`.
    pub fn attempts_at(&self, username: &str, now: DateTime<Utc>) -> u32 {
        self.entries
            .get(username)
            .filter(|record| !self.is_stale(record, now))
            .map(|record| record.count)
            .unwrap_or(0)
    }

    /// Checks whether the username has reached the lockout threshold.
    pub fn has_exceeded_max_attempts(&self, username: &str) -> bool {
        self.has_exceeded_max_attempts_at(username, Utc::now())
    }

    /// Checks the threshold as of `now`.
    pub fn has_exceeded_max_attempts_at(&self, username: &str, now: DateTime<Utc>) -> bool {
        self.attempts_at(username, now) >= self.max_attempts
    }

    /// Forgets all failures for the username. Returns `true` if a record
    /// was present.
    pub fn evict(&self, username: &str) -> bool {
        let removed = self.entries.remove(username).is_some();
        if removed {
            debug!(username = %username, "Evicted login attempt record");
        }
        removed
    }

    /// Moves the record kept under `from` to `to`, replacing any record
    /// already there. Returns `true` if a record moved.
    pub fn rename(&self, from: &str, to: &str) -> bool {
        if from == to {
            return self.entries.contains_key(from);
        }
        match self.entries.remove(from) {
            Some((_, record)) => {
                self.entries.insert(to.to_string(), record);
                debug!(from = %from, to = %to, "Moved login attempt record");
                true
            }
            None => false,
        }
    }

    /// Drops every record that outlived the window as of `now`. Returns the
    /// number of records removed.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, record| !self.is_stale(record, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Purged expired login attempt records");
        }
        removed
    }

    /// Drops every record that outlived the window.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    /// Number of usernames currently tracked, including stale records not
    /// yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no usernames are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_stale(&self, record: &AttemptRecord, now: DateTime<Utc>) -> bool {
        match self.window {
            Some(window) => now - record.last_failure > window,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache() -> LoginAttemptCache {
        LoginAttemptCache::new(5, Some(Duration::minutes(15)))
    }

    #[test]
    fn test_counts_from_one() {
        let cache = make_cache();
        assert_eq!(cache.attempts("alice"), 0);
        assert_eq!(cache.record_failure("alice"), 1);
        assert_eq!(cache.record_failure("alice"), 2);
        assert_eq!(cache.attempts("alice"), 2);
        assert_eq!(cache.attempts("bob"), 0);
    }

    #[test]
    fn test_threshold_then_evict() {
        let cache = make_cache();
        for _ in 0..4 {
            cache.record_failure("alice");
            assert!(!cache.has_exceeded_max_attempts("alice"));
        }
        cache.record_failure("alice");
        assert!(cache.has_exceeded_max_attempts("alice"));

        assert!(cache.evict("alice"));
        assert!(!cache.has_exceeded_max_attempts("alice"));
        assert_eq!(cache.attempts("alice"), 0);
        assert!(!cache.evict("alice"));
    }

    #[test]
    fn test_has_exceeded_does_not_mutate() {
        let cache = make_cache();
        assert!(!cache.has_exceeded_max_attempts("ghost"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_window_expiry() {
        let cache = make_cache();
        let start = Utc::now();
        for _ in 0..5 {
            cache.record_failure_at("alice", start);
        }
        assert!(cache.has_exceeded_max_attempts_at("alice", start + Duration::minutes(10)));
        assert!(!cache.has_exceeded_max_attempts_at("alice", start + Duration::minutes(16)));

        // A failure after expiry starts a fresh count.
        assert_eq!(
            cache.record_failure_at("alice", start + Duration::minutes(16)),
            1
        );
    }

    #[test]
    fn test_window_slides_with_each_failure() {
        let cache = make_cache();
        let start = Utc::now();
        cache.record_failure_at("alice", start);
        cache.record_failure_at("alice", start + Duration::minutes(10));
        assert_eq!(cache.attempts_at("alice", start + Duration::minutes(20)), 2);
    }

    #[test]
    fn test_no_window_keeps_records() {
        let cache = LoginAttemptCache::new(2, None);
        let start = Utc::now();
        cache.record_failure_at("alice", start);
        cache.record_failure_at("alice", start);
        assert!(cache.has_exceeded_max_attempts_at("alice", start + Duration::days(30)));
        assert_eq!(cache.purge_expired_at(start + Duration::days(30)), 0);
    }

    #[test]
    fn test_purge_expired() {
        let cache = make_cache();
        let start = Utc::now();
        cache.record_failure_at("old", start);
        cache.record_failure_at("fresh", start + Duration::minutes(20));
        assert_eq!(cache.purge_expired_at(start + Duration::minutes(25)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.attempts_at("fresh", start + Duration::minutes(25)), 1);
    }

    #[test]
    fn test_rename_moves_record() {
        let cache = LoginAttemptCache::new(2, None);
        cache.record_failure("bob");
        cache.record_failure("bob");

        assert!(cache.rename("bob", "robert"));
        assert_eq!(cache.attempts("bob"), 0);
        assert!(cache.has_exceeded_max_attempts("robert"));
        assert!(!cache.rename("bob", "bobby"));
        assert!(cache.rename("robert", "robert"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_threshold_is_raised() {
        let cache = LoginAttemptCache::new(0, None);
        assert_eq!(cache.max_attempts(), 1);
        assert!(!cache.has_exceeded_max_attempts("alice"));
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            max_failed_attempts: 3,
            attempt_window_minutes: 0,
            ..AuthConfig::default()
        };
        let cache = LoginAttemptCache::from_config(&config).unwrap();
        assert_eq!(cache.max_attempts(), 3);
        assert!(cache.window.is_none());

        let windowed = LoginAttemptCache::from_config(&AuthConfig::default()).unwrap();
        assert_eq!(windowed.window, Some(Duration::minutes(15)));
    }

    #[test]
    fn test_from_config_rejects_huge_window() {
        let config = AuthConfig {
            attempt_window_minutes: u64::MAX,
            ..AuthConfig::default()
        };
        let err = LoginAttemptCache::from_config(&config).unwrap_err();
        assert_eq!(err.kind, portal_core::ErrorKind::Configuration);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_failures_are_not_lost() {
        let cache = LoginAttemptCache::new(1000, None);
        let tasks: Vec<_> = (0..200)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.record_failure("alice") })
            })
            .collect();

        let mut counts: Vec<u32> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        counts.sort_unstable();

        assert_eq!(cache.attempts("alice"), 200);
        assert_eq!(counts, (1..=200).collect::<Vec<u32>>());
    }
}
