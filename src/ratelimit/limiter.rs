//! Core rate limiter implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::LimiterConfig;

use super::clock::{Clock, SystemClock};
use super::identity::{client_identifier, BucketKey};
use super::store::{InMemoryWindowStore, WindowStore};
use super::tiers::Tier;

/// Body message returned with every denial.
pub const DENIED_MESSAGE: &str = "Too many requests. Please try again later.";

/// The request fields the limiter consumes, as extracted by the host.
///
/// `method` is carried for logging only; tier classification is purely
/// path-based. `path` must be the exact pathname without query string.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    /// HTTP method
    pub method: &'a str,
    /// Request path, case-sensitive, no query string
    pub path: &'a str,
    /// Raw `X-Forwarded-For` header value, if present
    pub forwarded_for: Option<&'a str>,
    /// Raw `X-Real-IP` header value, if present
    pub real_ip: Option<&'a str>,
}

/// Informational headers describing a decision.
///
/// Emitted on every evaluated request, allowed or denied. The host must
/// attach them unconditionally to whatever response it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Tier's maximum requests per window
    pub limit: u32,
    /// Requests left in the current window after this one
    pub remaining: u32,
    /// Epoch seconds when the oldest counted request expires
    pub reset_epoch_secs: u64,
}

impl RateLimitHeaders {
    /// Render as header name/value pairs.
    pub fn as_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset_epoch_secs.to_string()),
        ]
    }
}

/// A request rejected for exceeding its quota.
///
/// The host must emit this as the response immediately and not proceed to
/// business logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// Decision headers, also present on denials
    pub headers: RateLimitHeaders,
    /// Seconds until the earliest slot frees, never negative
    pub retry_after_secs: u64,
}

impl Denial {
    /// HTTP status for a denial response.
    pub const STATUS: u16 = 429;

    /// JSON body for the denial response.
    pub fn body(&self) -> String {
        serde_json::json!({ "error": DENIED_MESSAGE }).to_string()
    }

    /// All headers for the denial response.
    pub fn response_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", "application/json".to_string()),
            ("Retry-After", self.retry_after_secs.to_string()),
        ];
        headers.extend(self.headers.as_pairs());
        headers
    }
}

/// The outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitOutcome {
    /// Under quota; forward the request with these headers attached
    Allowed(RateLimitHeaders),
    /// At or over quota; short-circuit with a 429
    Denied(Denial),
}

impl RateLimitOutcome {
    /// Whether the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitOutcome::Allowed(_))
    }

    /// The decision headers, present on both variants.
    pub fn headers(&self) -> &RateLimitHeaders {
        match self {
            RateLimitOutcome::Allowed(headers) => headers,
            RateLimitOutcome::Denied(denial) => &denial.headers,
        }
    }
}

/// The rate limiter: per-(client, path) sliding-window quotas with
/// tier limits chosen by path classification.
///
/// Owns all window state exclusively; hosts interact only through
/// [`evaluate`](Self::evaluate). Thread-safe and intended to be shared
/// behind an `Arc` for the life of the process.
pub struct RateLimiter {
    /// Window state, behind the swappable storage trait
    store: Arc<dyn WindowStore>,
    /// Tier limits, fixed at construction
    config: LimiterConfig,
    /// Time source
    clock: Arc<dyn Clock>,
    /// When the last sweep ran, gating cleanup to the configured interval
    last_sweep_ms: AtomicU64,
}

impl RateLimiter {
    /// Create a rate limiter with default tiers and in-memory storage.
    pub fn new() -> Self {
        Self::with_config(LimiterConfig::default())
    }

    /// Create a rate limiter with the given configuration.
    pub fn with_config(config: LimiterConfig) -> Self {
        Self::with_store(Arc::new(InMemoryWindowStore::new()), config)
    }

    /// Create a rate limiter over a custom window store.
    pub fn with_store(store: Arc<dyn WindowStore>, config: LimiterConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a rate limiter with an explicit time source.
    ///
    /// This is primarily useful for testing.
    pub fn with_clock(
        store: Arc<dyn WindowStore>,
        config: LimiterConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let last_sweep_ms = AtomicU64::new(clock.now_ms());
        Self {
            store,
            config,
            clock,
            last_sweep_ms,
        }
    }

    /// Evaluate one inbound request.
    ///
    /// Classifies the path into a tier, attributes the request to a client,
    /// and checks the (client, path) bucket against the tier's sliding
    /// window. An allowed evaluation consumes a slot; a denied one does not.
    /// This method never fails: unattributable requests share the
    /// `"unknown"` bucket.
    pub async fn evaluate(&self, request: &RequestInfo<'_>) -> RateLimitOutcome {
        let now_ms = self.clock.now_ms();
        let tier = Tier::classify(request.path);
        let limits = self.config.tiers.limits(tier);
        let client = client_identifier(request.forwarded_for, request.real_ip);
        let key = BucketKey::new(client, request.path);

        trace!(
            key = %key,
            tier = %tier,
            method = %request.method,
            "Checking rate limit"
        );

        let snapshot = self.store.observe(&key, limits, now_ms).await;
        self.maybe_sweep(now_ms, limits.window_ms).await;

        let reset_at_ms = snapshot.oldest_ms.unwrap_or(now_ms) + limits.window_ms;
        let headers = RateLimitHeaders {
            limit: limits.max_requests,
            remaining: limits.max_requests.saturating_sub(snapshot.count),
            reset_epoch_secs: reset_at_ms.div_ceil(1_000),
        };

        if snapshot.allowed {
            RateLimitOutcome::Allowed(headers)
        } else {
            debug!(
                key = %key,
                tier = %tier,
                limit = limits.max_requests,
                "Rate limit exceeded"
            );
            RateLimitOutcome::Denied(Denial {
                headers,
                retry_after_secs: reset_at_ms.saturating_sub(now_ms).div_ceil(1_000),
            })
        }
    }

    /// Number of buckets currently tracked.
    pub async fn tracked_buckets(&self) -> usize {
        self.store.tracked_buckets().await
    }

    /// Run the sweep if the cleanup interval has elapsed since the last one.
    ///
    /// The sweep only bounds memory; per-call pruning in the store is what
    /// guarantees correctness.
    async fn maybe_sweep(&self, now_ms: u64, window_ms: u64) {
        let interval_ms = self.config.cleanup_interval_secs * 1_000;
        let last = self.last_sweep_ms.load(Ordering::Relaxed);
        if now_ms.saturating_sub(last) < interval_ms {
            return;
        }
        // Lose the race, skip the sweep: another caller just ran it.
        if self
            .last_sweep_ms
            .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }
        self.store.sweep(now_ms.saturating_sub(window_ms)).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
