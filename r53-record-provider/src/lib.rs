//! # r53-record-provider
//!
//! Route53 hosted-zone API client used by the record reconciliation engine.
//!
//! The crate exposes one seam, the [`Route53Api`] trait, plus a concrete
//! [`Route53Client`] speaking the Route53 REST/XML API (version `2013-04-01`)
//! signed with AWS Signature Version 4.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use r53_record_provider::{
//!     create_client, AwsCredentials, ChangeAction, ChangeBatch, ClientOptions,
//!     RecordType, ResourceRecordSet, Route53Api,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = create_client(AwsCredentials::from_env()?, &ClientOptions::default())?;
//!
//!     let zone = api.get_hosted_zone("Z1D633PJN98FT9").await?;
//!     let batch = ChangeBatch::single(
//!         "Managed by r53-record",
//!         ChangeAction::Upsert,
//!         ResourceRecordSet::simple(
//!             format!("www.{}", zone.name),
//!             RecordType::A,
//!             300,
//!             vec!["192.0.2.1".to_string()],
//!         ),
//!     );
//!     let change = api.change_resource_record_sets(&zone.id, &batch).await?;
//!     println!("{} {:?}", change.id, change.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::HostedZoneNotFound`]: `NoSuchHostedZone`
//! - [`ProviderError::InvalidChangeBatch`]: the batch was rejected as a whole
//! - [`ProviderError::RateLimited`]: `Throttling` / `PriorRequestNotComplete` (retryable)
//! - [`ProviderError::NetworkError`]: network connectivity issue (retryable)
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are automatically
//! retried with exponential backoff. See [`ProviderError`] for the full list.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{ClientOptions, create_client};

// Re-export core trait only (internal traits are not exported)
pub use traits::Route53Api;

// Re-export types
pub use types::{
    AliasTarget, AwsCredentials, Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus,
    CredentialValidationError, FailoverRole, GeoLocation, HostedZone, RecordSetPage,
    RecordSetQuery, RecordType, ResourceRecordSet, RoutingPolicy,
};

// Re-export utils
pub use utils::datetime;
pub use utils::ids::{clean_change_id, clean_zone_id};

// Re-export the concrete client
pub use providers::{DEFAULT_ENDPOINT, DEFAULT_REGION, Route53Client, Route53ClientBuilder};
