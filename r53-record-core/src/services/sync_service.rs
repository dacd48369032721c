//! 变更收敛等待

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use r53_record_provider::{ChangeInfo, ChangeStatus};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;

/// 等待变更传播到所有权威服务器
pub struct SyncService {
    ctx: Arc<ServiceContext>,
}

impl SyncService {
    /// 创建收敛等待服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Sleep `initial_delay`, then poll `GetChange` until the change is `INSYNC`.
    ///
    /// The overall timeout includes the initial delay.
    pub async fn wait_for_change(
        &self,
        change_id: &str,
        initial_delay: Duration,
    ) -> CoreResult<ChangeInfo> {
        let limit = self.ctx.settings().timeout();

        log::debug!("Waiting {initial_delay:?} before polling change {change_id}");
        match timeout(limit, self.poll_until_insync(change_id, initial_delay)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::ConvergenceTimeout {
                change_id: change_id.to_string(),
                waited_secs: limit.as_secs(),
            }),
        }
    }

    async fn poll_until_insync(
        &self,
        change_id: &str,
        initial_delay: Duration,
    ) -> CoreResult<ChangeInfo> {
        let interval = self.ctx.settings().poll_interval();
        sleep(initial_delay).await;

        let mut polls = 0u32;
        loop {
            let info = self.ctx.api().get_change(change_id).await?;
            polls += 1;
            match info.status {
                ChangeStatus::Insync => {
                    log::info!("Change {change_id} is INSYNC after {polls} poll(s)");
                    return Ok(info);
                }
                ChangeStatus::Pending => {
                    log::debug!("Change {change_id} still PENDING, next poll in {interval:?}");
                    sleep(interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncSettings;
    use crate::test_utils::{create_test_context, create_test_context_with, FakeCall, FakeRoute53};
    use r53_record_provider::ProviderError;
    use tokio::time::Instant;

    fn get_change_calls(calls: &[FakeCall]) -> usize {
        calls
            .iter()
            .filter(|c| matches!(c, FakeCall::GetChange(_)))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn returns_after_third_poll() {
        let fake = Arc::new(FakeRoute53::new());
        fake.script_statuses(vec![
            ChangeStatus::Pending,
            ChangeStatus::Pending,
            ChangeStatus::Insync,
        ])
        .await;
        let svc = SyncService::new(create_test_context(fake.clone()));

        let started = Instant::now();
        let info = svc
            .wait_for_change("C1", Duration::from_secs(12))
            .await
            .unwrap();

        assert_eq!(info.status, ChangeStatus::Insync);
        assert_eq!(get_change_calls(&fake.calls().await), 3);
        // 初始延迟 + 两次 20s 轮询间隔
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(52));
        assert!(elapsed < Duration::from_secs(53));
    }

    #[tokio::test(start_paused = true)]
    async fn already_insync_polls_once() {
        let fake = Arc::new(FakeRoute53::new());
        let svc = SyncService::new(create_test_context(fake.clone()));

        svc.wait_for_change("C1", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(fake.calls().await, vec![FakeCall::GetChange("C1".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn never_insync_times_out() {
        let fake = Arc::new(FakeRoute53::new());
        fake.script_statuses(vec![ChangeStatus::Pending; 1000]).await;
        let settings = SyncSettings {
            timeout_secs: 120,
            ..SyncSettings::default()
        };
        let svc = SyncService::new(create_test_context_with(fake.clone(), settings));

        let started = Instant::now();
        let result = svc.wait_for_change("C9", Duration::from_secs(30)).await;

        assert!(
            matches!(
                &result,
                Err(CoreError::ConvergenceTimeout { change_id, waited_secs: 120 }) if change_id == "C9"
            ),
            "unexpected result: {result:?}"
        );
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(120));
        assert!(elapsed < Duration::from_secs(121));
        // 30s 后首次轮询，之后每 20s 一次：30, 50, 70, 90, 110
        assert_eq!(get_change_calls(&fake.calls().await), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_delay_counts_toward_timeout() {
        let fake = Arc::new(FakeRoute53::new());
        let settings = SyncSettings {
            timeout_secs: 5,
            ..SyncSettings::default()
        };
        let svc = SyncService::new(create_test_context_with(fake.clone(), settings));

        let result = svc.wait_for_change("C1", Duration::from_secs(10)).await;
        assert!(matches!(result, Err(CoreError::ConvergenceTimeout { .. })));
        assert!(fake.calls().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_propagates() {
        let fake = Arc::new(FakeRoute53::new());
        fake.fail_next_get_change(ProviderError::ChangeNotFound {
            provider: "route53".to_string(),
            change_id: "C1".to_string(),
            raw_message: None,
        })
        .await;
        let svc = SyncService::new(create_test_context(fake.clone()));

        let result = svc.wait_for_change("C1", Duration::from_secs(10)).await;
        assert!(matches!(
            result,
            Err(CoreError::Provider(ProviderError::ChangeNotFound { .. }))
        ));
    }
}
