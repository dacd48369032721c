//! Route53 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>
//!
//! ## 错误码分类
//!
//! - **资源不存在**：`NoSuchHostedZone`, `NoSuchChange`
//! - **Change batch 被拒绝**：`InvalidChangeBatch`（CREATE 已存在 / DELETE 不匹配）
//! - **参数错误**：`InvalidInput`, `InvalidArgument`, `InvalidDomainName`, `NoSuchHealthCheck` 等
//! - **限流/并发**：`Throttling`, `PriorRequestNotComplete`
//! - **认证错误**：`InvalidClientTokenId`, `SignatureDoesNotMatch`, `ExpiredToken` 等
//! - **权限拒绝**：`AccessDenied`
//! - **服务端错误**：`InternalFailure`, `ServiceUnavailable`

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Client;

/// Route53 错误码映射实现
impl ProviderErrorMapper for Route53Client {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ 资源不存在 ============
            Some("NoSuchHostedZone") => ProviderError::HostedZoneNotFound {
                provider: self.provider_name().to_string(),
                zone_id: context.zone_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },
            Some("NoSuchChange") => ProviderError::ChangeNotFound {
                provider: self.provider_name().to_string(),
                change_id: context.change_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ Change batch 被拒绝 ============
            Some("InvalidChangeBatch") => ProviderError::InvalidChangeBatch {
                provider: self.provider_name().to_string(),
                messages: if raw.messages.is_empty() {
                    vec![raw.message]
                } else {
                    raw.messages
                },
            },

            // ============ 参数无效 ============
            Some("InvalidDomainName") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "name".to_string(),
                detail: raw.message,
            },
            Some("NoSuchHealthCheck") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "health_check_id".to_string(),
                detail: raw.message,
            },
            Some(
                "InvalidInput"
                | "InvalidArgument"
                | "InvalidParameterValue"
                | "InvalidParameterCombination"
                | "MissingParameter"
                | "MalformedQueryString",
            ) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "input".to_string(),
                detail: raw.message,
            },

            // ============ 限流/并发 ============
            Some(
                "Throttling"
                | "ThrottlingException"
                | "RequestLimitExceeded"
                | "PriorRequestNotComplete", // 同一 zone 上一个变更尚未完成
            ) => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: context.retry_after,
                raw_message: Some(raw.message),
            },

            // ============ 认证错误 ============
            Some(
                "InvalidClientTokenId"
                | "SignatureDoesNotMatch"
                | "IncompleteSignature"
                | "MissingAuthenticationToken"
                | "ExpiredToken"
                | "UnrecognizedClientException"
                | "InvalidSignatureException",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 权限拒绝 ============
            Some("AccessDenied" | "AccessDeniedException" | "NotAuthorized") => {
                ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ 服务端错误（可重试） ============
            Some("InternalFailure" | "InternalError" | "ServiceUnavailable") => {
                ProviderError::NetworkError {
                    provider: self.provider_name().to_string(),
                    detail: raw.message,
                }
            }

            // ============ 其他错误 fallback ============
            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AwsCredentials;

    fn client() -> Option<Route53Client> {
        Route53Client::new(AwsCredentials::new("AKID", "secret")).ok()
    }

    #[test]
    fn no_such_hosted_zone_uses_context() {
        let Some(c) = client() else {
            panic!("client should build");
        };
        let err = c.map_error(
            RawApiError::with_code("NoSuchHostedZone", "No hosted zone found with ID: Z1"),
            ErrorContext::zone("Z1"),
        );
        assert!(
            matches!(&err, ProviderError::HostedZoneNotFound { zone_id, .. } if zone_id == "Z1"),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn invalid_change_batch_keeps_all_messages() {
        let Some(c) = client() else {
            panic!("client should build");
        };
        let err = c.map_error(
            RawApiError::change_batch(vec!["one".to_string(), "two".to_string()]),
            ErrorContext::default(),
        );
        assert!(
            matches!(&err, ProviderError::InvalidChangeBatch { messages, .. } if messages.len() == 2),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn invalid_change_batch_code_without_messages() {
        let Some(c) = client() else {
            panic!("client should build");
        };
        let err = c.map_error(
            RawApiError::with_code("InvalidChangeBatch", "RRSet already exists"),
            ErrorContext::default(),
        );
        assert!(
            matches!(&err, ProviderError::InvalidChangeBatch { messages, .. } if messages == &vec!["RRSet already exists".to_string()]),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn prior_request_not_complete_is_retryable() {
        let Some(c) = client() else {
            panic!("client should build");
        };
        let ctx = ErrorContext {
            retry_after: Some(3),
            ..ErrorContext::default()
        };
        let err = c.map_error(
            RawApiError::with_code("PriorRequestNotComplete", "busy"),
            ctx,
        );
        assert!(matches!(
            err,
            ProviderError::RateLimited {
                retry_after: Some(3),
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn signature_mismatch_is_invalid_credentials() {
        let Some(c) = client() else {
            panic!("client should build");
        };
        let err = c.map_error(
            RawApiError::with_code("SignatureDoesNotMatch", "bad sig"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn unknown_code_falls_back() {
        let Some(c) = client() else {
            panic!("client should build");
        };
        let err = c.map_error(
            RawApiError::with_code("TooManyHostedZones", "limit"),
            ErrorContext::default(),
        );
        assert!(
            matches!(&err, ProviderError::Unknown { raw_code: Some(code), .. } if code == "TooManyHostedZones"),
            "unexpected: {err:?}"
        );
    }
}
