//! Window storage trait and the in-memory default implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::identity::BucketKey;
use super::tiers::TierLimits;
use super::window::{TimestampWindow, WindowSnapshot};

/// Storage backend for per-bucket sliding windows.
///
/// This trait abstracts the key -> timestamp-list map so that a
/// multi-instance deployment can swap the in-memory map for a shared
/// external store while keeping the evaluation algorithm unchanged.
/// Implementations must make `observe` atomic per key: the prune,
/// count and append of a single observation may not interleave with
/// another observation of the same key.
#[async_trait]
pub trait WindowStore: Send + Sync {
    /// Observe one request for `key` at `now_ms` under `limits`.
    async fn observe(&self, key: &BucketKey, limits: TierLimits, now_ms: u64) -> WindowSnapshot;

    /// Drop timestamps at or before `cutoff_ms` and remove buckets left empty.
    async fn sweep(&self, cutoff_ms: u64);

    /// Number of buckets currently tracked.
    async fn tracked_buckets(&self) -> usize;
}

/// In-memory window store backed by a concurrent hash map.
///
/// Dashmap's per-shard locking serializes observations of the same key,
/// which is exactly the atomicity `WindowStore` requires; observations of
/// different keys proceed independently.
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    windows: DashMap<BucketKey, TimestampWindow>,
}

impl InMemoryWindowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all buckets.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.windows.clear();
    }
}

#[async_trait]
impl WindowStore for InMemoryWindowStore {
    async fn observe(&self, key: &BucketKey, limits: TierLimits, now_ms: u64) -> WindowSnapshot {
        let mut window = self.windows.entry(key.clone()).or_insert_with(|| {
            debug!(key = %key, "Tracking new rate limit bucket");
            TimestampWindow::new()
        });
        window.observe(limits, now_ms)
    }

    async fn sweep(&self, cutoff_ms: u64) {
        let before = self.windows.len();
        self.windows.retain(|_, window| {
            window.prune(cutoff_ms);
            !window.is_empty()
        });
        debug!(
            removed = before.saturating_sub(self.windows.len()),
            remaining = self.windows.len(),
            "Swept expired rate limit buckets"
        );
    }

    async fn tracked_buckets(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: TierLimits = TierLimits {
        max_requests: 2,
        window_ms: 1_000,
    };

    #[tokio::test]
    async fn test_observe_creates_bucket() {
        let store = InMemoryWindowStore::new();
        let key = BucketKey::new("1.2.3.4", "/api/links");

        let snap = store.observe(&key, LIMITS, 100).await;

        assert!(snap.allowed);
        assert_eq!(store.tracked_buckets().await, 1);
    }

    #[tokio::test]
    async fn test_observe_is_per_key() {
        let store = InMemoryWindowStore::new();
        let key1 = BucketKey::new("1.2.3.4", "/api/links");
        let key2 = BucketKey::new("1.2.3.4", "/api/profile/update");

        store.observe(&key1, LIMITS, 100).await;
        store.observe(&key1, LIMITS, 110).await;
        assert!(!store.observe(&key1, LIMITS, 120).await.allowed);

        // A different path for the same client is unaffected
        assert!(store.observe(&key2, LIMITS, 120).await.allowed);
    }

    #[tokio::test]
    async fn test_sweep_removes_empty_buckets() {
        let store = InMemoryWindowStore::new();
        let stale = BucketKey::new("1.2.3.4", "/api/links");
        let fresh = BucketKey::new("5.6.7.8", "/api/links");

        store.observe(&stale, LIMITS, 100).await;
        store.observe(&fresh, LIMITS, 2_000).await;
        assert_eq!(store.tracked_buckets().await, 2);

        store.sweep(1_500).await;

        assert_eq!(store.tracked_buckets().await, 1);
        // The surviving bucket kept its timestamp
        let snap = store.observe(&fresh, LIMITS, 2_010).await;
        assert_eq!(snap.oldest_ms, Some(2_000));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryWindowStore::new();
        store
            .observe(&BucketKey::new("a", "/x"), LIMITS, 100)
            .await;
        store.clear();
        assert_eq!(store.tracked_buckets().await, 0);
    }
}
