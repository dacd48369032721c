//! AWS Route53 client

mod error;
mod http;
mod provider;
mod sign;
/// Route53 API-specific XML request/response types.
pub(crate) mod types;

use reqwest::{Client, Url};

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::types::AwsCredentials;

/// Route53 API version path segment.
pub(crate) const ROUTE53_API_VERSION: &str = "2013-04-01";
/// XML namespace of request bodies.
pub(crate) const ROUTE53_XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
/// SigV4 service name.
pub(crate) const ROUTE53_SERVICE: &str = "route53";

/// Global Route53 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
/// Route53 is a global service signed against `us-east-1`.
pub const DEFAULT_REGION: &str = "us-east-1";

/// AWS Route53 client.
///
/// Authenticates via AWS Signature Version 4.
///
/// # Construction
///
/// ```rust,no_run
/// use r53_record_provider::{AwsCredentials, Route53Client};
///
/// let client = Route53Client::builder(AwsCredentials::new("AKID", "secret"))
///     .max_retries(3)
///     .build()?;
/// # Ok::<(), r53_record_provider::ProviderError>(())
/// ```
pub struct Route53Client {
    pub(crate) client: Client,
    pub(crate) credentials: AwsCredentials,
    /// Endpoint without trailing slash, e.g. `https://route53.amazonaws.com`.
    pub(crate) endpoint: String,
    /// `Host` header value (including a non-default port).
    pub(crate) host: String,
    pub(crate) region: String,
    pub(crate) max_retries: u32,
}

/// Builder for [`Route53Client`] with configurable endpoint, region and retry behavior.
pub struct Route53ClientBuilder {
    credentials: AwsCredentials,
    endpoint: String,
    region: String,
    max_retries: u32,
}

impl Route53ClientBuilder {
    fn new(credentials: AwsCredentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_retries: 2,
        }
    }

    /// Override the API endpoint (default: `https://route53.amazonaws.com`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the signing region (default: `us-east-1`).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`Route53Client`] instance.
    pub fn build(self) -> Result<Route53Client> {
        let endpoint = self.endpoint.trim_end_matches('/').to_string();
        let url = Url::parse(&endpoint).map_err(|e| ProviderError::InvalidParameter {
            provider: "route53".to_string(),
            param: "endpoint".to_string(),
            detail: format!("{endpoint}: {e}"),
        })?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ProviderError::InvalidParameter {
                    provider: "route53".to_string(),
                    param: "endpoint".to_string(),
                    detail: format!("{endpoint}: missing host"),
                });
            }
        };

        Ok(Route53Client {
            client: create_http_client()?,
            credentials: self.credentials,
            endpoint,
            host,
            region: self.region,
            max_retries: self.max_retries,
        })
    }
}

impl Route53Client {
    /// Creates a client for the global endpoint with default settings (2 retries).
    pub fn new(credentials: AwsCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: AwsCredentials) -> Route53ClientBuilder {
        Route53ClientBuilder::new(credentials)
    }
}
