//! Rate limit tiers and static path classification.
//!
//! Every API path maps to exactly one of four fixed tiers. Classification
//! is pure and stateless; the path lists below are compatibility constants
//! shared with the rest of the application and are deliberately not
//! configurable.

use serde::{Deserialize, Serialize};

/// Paths holding security-sensitive mutations. Always rate limited at the
/// strict tier, even though they sit under the auth namespace.
const STRICT_PATHS: [&str; 3] = [
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
    "/api/settings/delete-account",
];

/// Prefix for authentication endpoints.
const AUTH_PREFIX: &str = "/api/auth/";

/// The anonymous click-tracking endpoint.
const CLICK_PATH: &str = "/api/links/click";

/// Prefix for anonymous public-profile lookups.
const PUBLIC_PROFILE_PREFIX: &str = "/api/public-profile/";

/// The rate tier a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Destructive or security-sensitive actions
    Strict,
    /// Authentication endpoints
    Auth,
    /// Anonymous public-facing reads
    Public,
    /// Everything else
    Standard,
}

impl Tier {
    /// Classify a request path into its tier.
    ///
    /// Matching is ordered and the first match wins: the strict list takes
    /// precedence over the auth prefix it overlaps with.
    pub fn classify(path: &str) -> Self {
        if STRICT_PATHS.contains(&path) {
            return Tier::Strict;
        }
        if path.starts_with(AUTH_PREFIX) {
            return Tier::Auth;
        }
        if path == CLICK_PATH || path.starts_with(PUBLIC_PROFILE_PREFIX) {
            return Tier::Public;
        }
        Tier::Standard
    }

    /// Get the tier's name as used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Strict => "strict",
            Tier::Auth => "auth",
            Tier::Public => "public",
            Tier::Standard => "standard",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The (limit, window) pair enforced for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    /// Maximum requests allowed within the window
    pub max_requests: u32,
    /// Window duration in milliseconds
    pub window_ms: u64,
}

impl TierLimits {
    /// 5 requests per 15 minutes.
    pub const STRICT: Self = Self {
        max_requests: 5,
        window_ms: 15 * 60 * 1000,
    };

    /// 20 requests per 15 minutes.
    pub const AUTH: Self = Self {
        max_requests: 20,
        window_ms: 15 * 60 * 1000,
    };

    /// 60 requests per minute.
    pub const PUBLIC: Self = Self {
        max_requests: 60,
        window_ms: 60 * 1000,
    };

    /// 100 requests per minute.
    pub const STANDARD: Self = Self {
        max_requests: 100,
        window_ms: 60 * 1000,
    };
}
