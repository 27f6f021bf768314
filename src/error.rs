//! Error types for the Clickgate crate.

use thiserror::Error;

/// Main error type for Clickgate operations.
///
/// [`crate::ratelimit::RateLimiter::evaluate`] is infallible by design;
/// these variants only arise while loading configuration.
#[derive(Error, Debug)]
pub enum ClickgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Clickgate operations.
pub type Result<T> = std::result::Result<T, ClickgateError>;
