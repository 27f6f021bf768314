//! Configuration management for Clickgate.
//!
//! Defaults reproduce the application's published tier constants exactly;
//! a deployment only loads a file to override them. Path classification is
//! not configurable (see [`crate::ratelimit::Tier`]).

use serde::{Deserialize, Serialize};

use crate::error::{ClickgateError, Result};
use crate::ratelimit::TierLimits;

/// Main configuration for the rate limiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Per-tier limits
    #[serde(default)]
    pub tiers: TierTable,

    /// Minimum spacing between garbage-collection sweeps, in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

/// The limits for each of the four fixed tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTable {
    /// Destructive or security-sensitive actions
    #[serde(default = "default_strict")]
    pub strict: TierLimits,

    /// Authentication endpoints
    #[serde(default = "default_auth")]
    pub auth: TierLimits,

    /// Anonymous public-facing reads
    #[serde(default = "default_public")]
    pub public: TierLimits,

    /// Everything else
    #[serde(default = "default_standard")]
    pub standard: TierLimits,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            auth: default_auth(),
            public: default_public(),
            standard: default_standard(),
        }
    }
}

fn default_strict() -> TierLimits {
    TierLimits::STRICT
}

fn default_auth() -> TierLimits {
    TierLimits::AUTH
}

fn default_public() -> TierLimits {
    TierLimits::PUBLIC
}

fn default_standard() -> TierLimits {
    TierLimits::STANDARD
}

impl TierTable {
    /// Get the limits for a tier.
    pub fn limits(&self, tier: crate::ratelimit::Tier) -> TierLimits {
        use crate::ratelimit::Tier;
        match tier {
            Tier::Strict => self.strict,
            Tier::Auth => self.auth,
            Tier::Public => self.public,
            Tier::Standard => self.standard,
        }
    }
}

impl LimiterConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ClickgateError::Config(e.to_string()))
    }
}
