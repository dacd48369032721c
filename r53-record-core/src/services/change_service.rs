//! 变更提交服务

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use r53_record_provider::{ChangeBatch, ChangeInfo, ProviderError};

use crate::error::CoreResult;
use crate::services::ServiceContext;

/// First backoff step while a new hosted zone is not yet visible.
const ZONE_RETRY_INITIAL: Duration = Duration::from_millis(500);
const ZONE_RETRY_MAX: Duration = Duration::from_secs(10);

/// 变更批次提交服务
pub struct ChangeService {
    ctx: Arc<ServiceContext>,
}

impl ChangeService {
    /// 创建变更提交服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 提交变更批次
    ///
    /// Route53 may report `NoSuchHostedZone` for a zone created moments ago.
    /// That error alone is retried with exponential backoff for the configured
    /// budget; once the budget is spent a final attempt is made and its result
    /// returned as is. Any other error is returned immediately.
    pub async fn submit_change(&self, zone_id: &str, batch: &ChangeBatch) -> CoreResult<ChangeInfo> {
        let deadline = Instant::now() + self.ctx.settings().submit_retry_budget();
        let mut delay = ZONE_RETRY_INITIAL;

        loop {
            match self.ctx.api().change_resource_record_sets(zone_id, batch).await {
                Err(ProviderError::HostedZoneNotFound { .. }) if Instant::now() + delay < deadline => {
                    log::debug!("Hosted zone {zone_id} not found, retrying in {delay:?}...");
                    sleep(delay).await;
                    delay = (delay * 2).min(ZONE_RETRY_MAX);
                }
                Err(ProviderError::HostedZoneNotFound { .. }) => break,
                other => return other.map_err(Into::into),
            }
        }

        log::warn!("Retry budget for zone {zone_id} exhausted, submitting one last time");
        Ok(self
            .ctx
            .api()
            .change_resource_record_sets(zone_id, batch)
            .await?)
    }

    /// 提交删除批次（不重试）
    ///
    /// A rejected batch (`InvalidChangeBatch`) means the record set is already
    /// gone or differs; it is treated as done and yields `None`.
    pub async fn delete_record_set(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> CoreResult<Option<ChangeInfo>> {
        match self.ctx.api().change_resource_record_sets(zone_id, batch).await {
            Ok(info) => Ok(Some(info)),
            Err(ProviderError::InvalidChangeBatch { messages, .. }) => {
                log::warn!(
                    "Delete batch for zone {zone_id} rejected, nothing to wait for: {}",
                    messages.join("; ")
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
