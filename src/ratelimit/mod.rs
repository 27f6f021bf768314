//! Rate limiting logic and state management.

mod clock;
mod identity;
mod limiter;
mod store;
mod tiers;
mod window;

pub use clock::{Clock, SystemClock};
pub use identity::{client_identifier, BucketKey, UNKNOWN_CLIENT};
pub use limiter::{
    Denial, RateLimitHeaders, RateLimitOutcome, RateLimiter, RequestInfo, DENIED_MESSAGE,
};
pub use store::{InMemoryWindowStore, WindowStore};
pub use tiers::{Tier, TierLimits};
pub use window::{TimestampWindow, WindowSnapshot};
