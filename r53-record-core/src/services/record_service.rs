//! Route53 记录同步服务
//!
//! Create / Read / Update / Delete / Import of one managed record set. Every
//! mutation is a change batch followed by a wait until Route53 reports the
//! change `INSYNC`, then a fresh read of the record set.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use r53_record_provider::{
    Change, ChangeAction, ChangeBatch, HostedZone, ProviderError, RecordSetQuery, RecordType,
    ResourceRecordSet,
};

use crate::error::{CoreError, CoreResult};
use crate::services::{ChangeService, ServiceContext, SyncService};
use crate::types::{DesiredRecord, RecordIdentity, RecordState};
use crate::utils::names::{clean_record_name, expand_record_name, fqdn};

/// Comment attached to create / update batches.
pub const CREATE_COMMENT: &str = "Managed by r53-record";
/// Comment attached to delete batches.
pub const DELETE_COMMENT: &str = "Deleted by r53-record";

/// Route53 记录同步服务
pub struct RecordService {
    ctx: Arc<ServiceContext>,
    changes: ChangeService,
    sync: SyncService,
    /// 仅用于计算首次轮询前的随机延迟
    rng: Mutex<StdRng>,
}

impl RecordService {
    /// 创建记录服务实例（随机源取自操作系统）
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self::with_rng(ctx, StdRng::from_os_rng())
    }

    /// 使用固定种子创建，延迟序列可复现
    #[must_use]
    pub fn with_seed(ctx: Arc<ServiceContext>, seed: u64) -> Self {
        Self::with_rng(ctx, StdRng::seed_from_u64(seed))
    }

    fn with_rng(ctx: Arc<ServiceContext>, rng: StdRng) -> Self {
        Self {
            changes: ChangeService::new(ctx.clone()),
            sync: SyncService::new(ctx.clone()),
            ctx,
            rng: Mutex::new(rng),
        }
    }

    // ===== 公开操作 =====

    /// Create the declared record set.
    ///
    /// Uses `CREATE` unless `allow_overwrite` is set, so an existing record set
    /// managed elsewhere makes the batch fail instead of being taken over.
    pub async fn create(&self, desired: &DesiredRecord) -> CoreResult<RecordState> {
        self.apply(desired, true).await
    }

    /// Bring an existing record set in line with `desired`.
    ///
    /// Same type and set identifier: plain `UPSERT`. Otherwise the old record
    /// set is deleted and the new one created in a single atomic batch.
    pub async fn update(
        &self,
        prior: &RecordState,
        desired: &DesiredRecord,
    ) -> CoreResult<RecordState> {
        if prior.record_type == desired.record_type
            && prior.set_identifier.as_deref() == desired.set_identifier()
        {
            return self.apply(desired, false).await;
        }

        let zone = self.zone(&desired.zone_id).await?;
        let old_name = expand_record_name(&prior.name, &zone.name);
        let new_name = expand_record_name(&desired.name, &zone.name);

        // Route53 只删除与当前内容完全一致的记录集，优先使用线上记录
        let old_set = match self.find_record(&prior.identity(), prior.record_type).await {
            Ok((_, set)) => set,
            Err(e) if e.is_not_found() => {
                log::warn!("{e}, deleting {} from persisted state", prior.id);
                prior.to_record_set(&old_name)
            }
            Err(e) => return Err(e),
        };

        let batch = ChangeBatch {
            comment: Some(CREATE_COMMENT.to_string()),
            changes: vec![
                Change {
                    action: ChangeAction::Delete,
                    record_set: old_set,
                },
                Change {
                    action: ChangeAction::Create,
                    record_set: desired.to_record_set(&new_name),
                },
            ],
        };

        log::info!(
            "Replacing {} {old_name} with {} {new_name} in zone {}",
            prior.record_type,
            desired.record_type,
            zone.id
        );
        self.submit_and_converge(&zone.id, &batch, desired).await
    }

    /// Refresh persisted state from Route53.
    ///
    /// Returns `None` when the zone or the record set no longer exists; the
    /// caller should drop the resource.
    pub async fn read(&self, state: &RecordState) -> CoreResult<Option<RecordState>> {
        self.read_identity(&state.identity(), state.record_type, state.allow_overwrite)
            .await
    }

    /// Delete the record set. A missing zone or record set counts as deleted.
    pub async fn delete(&self, state: &RecordState) -> CoreResult<()> {
        let identity = state.identity();
        let record_set = match self.find_record(&identity, state.record_type).await {
            Ok((_, set)) => set,
            Err(e) if e.is_not_found() => {
                log::info!("{e}, nothing to delete for {identity}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let batch = ChangeBatch::single(DELETE_COMMENT, ChangeAction::Delete, record_set);
        match self
            .changes
            .delete_record_set(&identity.zone_id, &batch)
            .await?
        {
            Some(info) => {
                self.sync
                    .wait_for_change(&info.id, self.initial_delay())
                    .await?;
                log::info!("Deleted record {identity}");
            }
            None => log::info!("No change info for {identity}, waiting for sync not required"),
        }
        Ok(())
    }

    /// Adopt an existing record set by its composite ID.
    pub async fn import(&self, id: &str) -> CoreResult<Option<RecordState>> {
        let identity = RecordIdentity::parse(id);
        let record_type = RecordType::parse(&identity.record_type)
            .filter(|_| identity.is_complete())
            .ok_or_else(|| CoreError::MalformedImportId(id.to_string()))?;

        self.read_identity(&identity, record_type, false).await
    }

    // ===== 内部实现 =====

    async fn apply(&self, desired: &DesiredRecord, fresh: bool) -> CoreResult<RecordState> {
        let zone = self.zone(&desired.zone_id).await?;
        let expanded = expand_record_name(&desired.name, &zone.name);

        // 只有显式允许覆盖或更新已有资源时才使用 UPSERT
        let action = if desired.allow_overwrite || !fresh {
            ChangeAction::Upsert
        } else {
            ChangeAction::Create
        };
        let batch = ChangeBatch::single(CREATE_COMMENT, action, desired.to_record_set(&expanded));

        log::info!(
            "{} {} {expanded} in zone {}",
            action.as_str(),
            desired.record_type,
            zone.id
        );
        self.submit_and_converge(&zone.id, &batch, desired).await
    }

    async fn submit_and_converge(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
        desired: &DesiredRecord,
    ) -> CoreResult<RecordState> {
        let info = self.changes.submit_change(zone_id, batch).await?;
        let identity = desired.identity();
        log::debug!("Change {} submitted for {identity}", info.id);

        self.sync
            .wait_for_change(&info.id, self.initial_delay())
            .await?;

        let (fqdn, set) = self.find_record(&identity, desired.record_type).await?;
        Ok(RecordState::from_record_set(
            &identity,
            desired.record_type,
            fqdn,
            &set,
            desired.allow_overwrite,
        ))
    }

    async fn read_identity(
        &self,
        identity: &RecordIdentity,
        record_type: RecordType,
        allow_overwrite: bool,
    ) -> CoreResult<Option<RecordState>> {
        match self.find_record(identity, record_type).await {
            Ok((fqdn, set)) => Ok(Some(RecordState::from_record_set(
                identity,
                record_type,
                fqdn,
                &set,
                allow_overwrite,
            ))),
            Err(e) if e.is_not_found() => {
                log::warn!("{e} for {identity}, removing from state");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn zone(&self, zone_id: &str) -> CoreResult<HostedZone> {
        self.ctx
            .api()
            .get_hosted_zone(zone_id)
            .await
            .map_err(|e| zone_error(zone_id, e))
    }

    /// 查找记录集，返回展开后的记录名与 Route53 返回的记录集
    ///
    /// The listing starts at the target key and is ordered by
    /// (name, type, set identifier), so the scan stops as soon as the next
    /// page would begin at another name or type.
    async fn find_record(
        &self,
        identity: &RecordIdentity,
        record_type: RecordType,
    ) -> CoreResult<(String, ResourceRecordSet)> {
        let zone = self.zone(&identity.zone_id).await?;
        let expanded = expand_record_name(&identity.name, &zone.name);
        log::debug!("Expanded record name: {expanded}");

        let record_name = fqdn(&expanded.to_lowercase());
        let type_token = record_type.as_str();
        let set_identifier = identity.set_identifier();

        let mut query = RecordSetQuery {
            start_name: Some(record_name.clone()),
            start_type: Some(type_token.to_string()),
            start_identifier: set_identifier.map(str::to_string),
            max_items: None,
        };

        loop {
            let page = self
                .ctx
                .api()
                .list_resource_record_sets(&identity.zone_id, &query)
                .await
                .map_err(|e| zone_error(&identity.zone_id, e))?;

            let found = page.record_sets.iter().find(|set| {
                clean_record_name(&set.name).to_lowercase() == record_name
                    && set.record_type.to_uppercase() == type_token
                    && set_identifier.is_none_or(|id| set.set_identifier.as_deref() == Some(id))
            });
            if let Some(set) = found {
                return Ok((expanded, set.clone()));
            }

            let next_name = page
                .next_record_name
                .as_deref()
                .map(|n| clean_record_name(n).to_lowercase())
                .unwrap_or_default();
            let next_type = page
                .next_record_type
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_default();
            if next_name != record_name || next_type != type_token {
                break;
            }

            match page.next_query(None) {
                Some(next) => query = next,
                None => break,
            }
        }

        Err(CoreError::RecordNotFound(format!(
            "{record_name} {type_token} in zone {}",
            identity.zone_id
        )))
    }

    /// 首次轮询前的随机延迟 [min_delay, max_delay)
    fn initial_delay(&self) -> Duration {
        let settings = self.ctx.settings();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Duration::from_secs(rng.random_range(settings.min_delay_secs..settings.max_delay_secs))
    }
}

/// `NoSuchHostedZone` 转为 [`CoreError::ZoneNotFound`]
fn zone_error(zone_id: &str, e: ProviderError) -> CoreError {
    match e {
        ProviderError::HostedZoneNotFound { .. } => CoreError::ZoneNotFound(zone_id.to_string()),
        other => other.into(),
    }
}
