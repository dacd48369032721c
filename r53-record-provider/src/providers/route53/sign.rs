//! AWS Signature Version 4
//!
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html>

use std::fmt::Write;

use crate::providers::common::{hmac_sha256, sha256_hex};
use crate::utils::log_sanitizer::{redact_authorization, truncate_for_log};

use super::{ROUTE53_SERVICE, Route53Client};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Headers produced by signing one request.
#[derive(Debug, Clone)]
pub(crate) struct SignedRequest {
    /// `x-amz-date`, `YYYYMMDDTHHMMSSZ`.
    pub amz_date: String,
    pub authorization: String,
    pub security_token: Option<String>,
}

/// Derive the SigV4 signing key: `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`.
pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Canonical query string: parameters URI-encoded, then sorted by key.
pub(crate) fn canonical_query(params: &[(&str, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();
    encoded
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

impl Route53Client {
    /// Sign a request.
    ///
    /// `query` must already be canonical (see [`canonical_query`]); the same
    /// string is sent on the wire.
    pub(crate) fn sign(
        &self,
        method: &str,
        path: &str,
        query: &str,
        payload: &str,
        amz_date: &str,
    ) -> SignedRequest {
        let date = &amz_date[..amz_date.len().min(8)];
        let scope = format!("{date}/{}/{ROUTE53_SERVICE}/aws4_request", self.region);

        // 1. Canonical headers, lower-case and sorted by name
        let mut headers: Vec<(&str, &str)> = vec![("host", self.host.as_str()), ("x-amz-date", amz_date)];
        if let Some(token) = &self.credentials.session_token {
            headers.push(("x-amz-security-token", token.as_str()));
        }
        headers.sort_by(|a, b| a.0.cmp(b.0));

        let canonical_headers = headers.iter().fold(String::new(), |mut acc, (k, v)| {
            let _ = writeln!(acc, "{k}:{}", v.trim());
            acc
        });
        let signed_headers = headers
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(";");

        // 2. Canonical request
        let canonical_request = format!(
            "{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{}",
            sha256_hex(payload.as_bytes())
        );
        log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

        // 3. String to sign
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );
        log::debug!("StringToSign:\n{string_to_sign}");

        // 4. Signature
        let key = signing_key(
            &self.credentials.secret_access_key,
            date,
            &self.region,
            ROUTE53_SERVICE,
        );
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );
        log::debug!("Authorization: {}", redact_authorization(&authorization));

        SignedRequest {
            amz_date: amz_date.to_string(),
            authorization,
            security_token: self.credentials.session_token.clone(),
        }
    }
}
