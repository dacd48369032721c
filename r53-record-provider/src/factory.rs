//! Client factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::Route53Client;
use crate::traits::Route53Api;
use crate::types::AwsCredentials;

/// Connection options for [`create_client`].
///
/// `None` fields fall back to the builder defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub max_retries: Option<u32>,
}

/// Creates a [`Route53Api`] instance from the given credentials.
///
/// The returned client is wrapped in `Arc<dyn Route53Api>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use r53_record_provider::{create_client, AwsCredentials, ClientOptions};
///
/// let api = create_client(
///     AwsCredentials::new("AKID", "secret"),
///     &ClientOptions::default(),
/// ).unwrap();
/// ```
pub fn create_client(
    credentials: AwsCredentials,
    options: &ClientOptions,
) -> Result<Arc<dyn Route53Api>> {
    let mut builder = Route53Client::builder(credentials);
    if let Some(endpoint) = &options.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    if let Some(region) = &options.region {
        builder = builder.region(region.clone());
    }
    if let Some(max_retries) = options.max_retries {
        builder = builder.max_retries(max_retries);
    }
    Ok(Arc::new(builder.build()?))
}
