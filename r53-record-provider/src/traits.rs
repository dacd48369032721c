use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{ChangeBatch, ChangeInfo, HostedZone, RecordSetPage, RecordSetQuery};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（如 `NoSuchHostedZone`）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// `InvalidChangeBatch` 携带的逐条消息
    pub messages: Vec<String>,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            messages: Vec::new(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            messages: Vec::new(),
        }
    }

    pub fn change_batch(messages: Vec<String>) -> Self {
        Self {
            code: Some("InvalidChangeBatch".to_string()),
            message: messages.join("; "),
            messages,
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Hosted zone ID（用于 `HostedZoneNotFound`）
    pub zone_id: Option<String>,
    /// Change ID（用于 `ChangeNotFound`）
    pub change_id: Option<String>,
    /// HTTP `Retry-After`（秒）
    pub retry_after: Option<u64>,
}

impl ErrorContext {
    pub fn zone(zone_id: &str) -> Self {
        Self {
            zone_id: Some(zone_id.to_string()),
            ..Self::default()
        }
    }

    pub fn change(change_id: &str) -> Self {
        Self {
            change_id: Some(change_id.to_string()),
            ..Self::default()
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Route53 hosted-zone API
///
/// The reconciliation engine only depends on this trait; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait Route53Api: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取 hosted zone（`NoSuchHostedZone` → [`ProviderError::HostedZoneNotFound`]）
    async fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZone>;

    /// 原子提交 change batch
    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo>;

    /// 查询 change 的传播状态
    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo>;

    /// 从 `query` 指定的位置开始列出 record sets（单页）
    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        query: &RecordSetQuery,
    ) -> Result<RecordSetPage>;
}
