//! Clickgate - Sliding-Window Rate Limiting
//!
//! This crate implements the in-process rate limiter that protects a
//! link-in-bio application's API routes. Requests are bucketed per
//! (client, path) and checked against per-tier sliding windows tracked
//! as timestamp lists. The host application calls
//! [`ratelimit::RateLimiter::evaluate`] before dispatching a request and
//! either short-circuits with a 429 response or forwards the request with
//! informational headers attached.

pub mod config;
pub mod error;
pub mod ratelimit;
