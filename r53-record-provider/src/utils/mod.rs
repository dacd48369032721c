//! Utility modules.

/// Date/time serialization helpers for change timestamps.
pub mod datetime;

/// Normalization of IDs returned by the Route53 API.
pub mod ids;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
