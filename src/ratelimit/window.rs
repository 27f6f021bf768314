//! Sliding-window primitive: an ordered list of request timestamps.

use super::tiers::TierLimits;

/// The result of observing a request against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Whether the request was admitted (and its timestamp recorded)
    pub allowed: bool,
    /// Number of timestamps tracked after the observation
    pub count: u32,
    /// Oldest tracked timestamp, if any
    pub oldest_ms: Option<u64>,
}

/// Request timestamps for one bucket, oldest first.
///
/// Timestamps are epoch milliseconds and monotonically non-decreasing since
/// only "now" is ever appended. The list never grows past the tier's
/// `max_requests`: denied requests are not recorded.
#[derive(Debug, Clone, Default)]
pub struct TimestampWindow {
    timestamps: Vec<u64>,
}

impl TimestampWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one request at `now_ms` under the given limits.
    ///
    /// Prunes timestamps that have left the window (a timestamp exactly at
    /// the window boundary counts as expired), admits the request if fewer
    /// than `max_requests` remain, and records `now_ms` only on admit.
    pub fn observe(&mut self, limits: TierLimits, now_ms: u64) -> WindowSnapshot {
        let window_start = now_ms.saturating_sub(limits.window_ms);
        self.timestamps.retain(|&t| t > window_start);

        let allowed = (self.timestamps.len() as u32) < limits.max_requests;
        if allowed {
            self.timestamps.push(now_ms);
        }

        WindowSnapshot {
            allowed,
            count: self.timestamps.len() as u32,
            oldest_ms: self.timestamps.first().copied(),
        }
    }

    /// Drop all timestamps at or before `cutoff_ms`.
    pub fn prune(&mut self, cutoff_ms: u64) {
        self.timestamps.retain(|&t| t > cutoff_ms);
    }

    /// Whether the window holds no timestamps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of tracked timestamps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}
