//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod route53;

pub use route53::{DEFAULT_ENDPOINT, DEFAULT_REGION, Route53Client, Route53ClientBuilder};
