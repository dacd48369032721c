//! 业务逻辑服务层

mod change_service;
mod record_service;
mod sync_service;

pub use change_service::ChangeService;
pub use record_service::{RecordService, CREATE_COMMENT, DELETE_COMMENT};
pub use sync_service::SyncService;

use std::sync::Arc;

use r53_record_provider::Route53Api;

use crate::config::SyncSettings;

/// 服务上下文 - 持有所有依赖
///
/// 平台层创建 Route53 客户端并注入；多个记录实例可共享同一上下文。
pub struct ServiceContext {
    /// Route53 API
    pub api: Arc<dyn Route53Api>,
    /// 提交重试与收敛等待的时间参数，仅经 `new` 校验后写入
    settings: SyncSettings,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(api: Arc<dyn Route53Api>, settings: SyncSettings) -> Self {
        Self {
            api,
            settings: settings.validated(),
        }
    }

    /// 获取 Route53 API 实例
    pub fn api(&self) -> &dyn Route53Api {
        self.api.as_ref()
    }

    /// Validated timing settings.
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }
}
