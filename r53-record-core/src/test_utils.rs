//! 测试辅助模块
//!
//! 提供内存版 Route53 和便捷的测试工厂方法。
//! Enabled for other crates' tests through the `test-utils` feature.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use r53_record_provider::{
    ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, HostedZone, ProviderError,
    RecordSetPage, RecordSetQuery, ResourceRecordSet, Result, Route53Api,
};
use tokio::sync::RwLock;

use crate::config::SyncSettings;
use crate::services::ServiceContext;
use crate::utils::names::{clean_record_name, fqdn};

const PROVIDER: &str = "route53";

/// (name, type, set identifier)，name 为小写 FQDN
type RecordKey = (String, String, String);
type ZoneRecords = BTreeMap<RecordKey, ResourceRecordSet>;

/// Calls observed by [`FakeRoute53`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    GetHostedZone(String),
    ChangeResourceRecordSets { zone_id: String, batch: ChangeBatch },
    GetChange(String),
    ListResourceRecordSets { zone_id: String, query: RecordSetQuery },
}

// ===== FakeRoute53 =====

/// In-memory Route53.
///
/// Listing contract: record sets are sorted by (lower-cased FQDN, type, set
/// identifier) and a page begins at the first entry at or after the start
/// key. `*` in names is returned escaped as `\052`, as Route53 does.
/// Change batches are applied atomically; `GetChange` answers from the
/// scripted status queue and reports `INSYNC` once it is empty.
pub struct FakeRoute53 {
    zones: RwLock<HashMap<String, HostedZone>>,
    records: RwLock<HashMap<String, ZoneRecords>>,
    statuses: RwLock<VecDeque<ChangeStatus>>,
    change_errors: RwLock<VecDeque<ProviderError>>,
    get_change_errors: RwLock<VecDeque<ProviderError>>,
    list_errors: RwLock<VecDeque<ProviderError>>,
    calls: RwLock<Vec<FakeCall>>,
    next_change: RwLock<u32>,
    page_size: usize,
}

impl FakeRoute53 {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            records: RwLock::new(HashMap::new()),
            statuses: RwLock::new(VecDeque::new()),
            change_errors: RwLock::new(VecDeque::new()),
            get_change_errors: RwLock::new(VecDeque::new()),
            list_errors: RwLock::new(VecDeque::new()),
            calls: RwLock::new(Vec::new()),
            next_change: RwLock::new(1),
            page_size: 100,
        }
    }

    pub fn with_zone(id: &str, name: &str) -> Self {
        let mut fake = Self::new();
        fake.zones.get_mut().insert(
            id.to_string(),
            HostedZone {
                id: id.to_string(),
                name: name.to_string(),
                private_zone: false,
                record_count: None,
                comment: None,
            },
        );
        fake.records.get_mut().insert(id.to_string(), BTreeMap::new());
        fake
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub async fn insert_record(&self, zone_id: &str, set: ResourceRecordSet) {
        let (key, set) = normalize(set);
        self.records
            .write()
            .await
            .entry(zone_id.to_string())
            .or_default()
            .insert(key, set);
    }

    pub async fn remove_record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: &str,
        set_identifier: Option<&str>,
    ) {
        if let Some(zone) = self.records.write().await.get_mut(zone_id) {
            zone.remove(&key_of(name, record_type, set_identifier));
        }
    }

    pub async fn record(
        &self,
        zone_id: &str,
        name: &str,
        record_type: &str,
        set_identifier: Option<&str>,
    ) -> Option<ResourceRecordSet> {
        self.records
            .read()
            .await
            .get(zone_id)
            .and_then(|zone| zone.get(&key_of(name, record_type, set_identifier)))
            .cloned()
    }

    /// Statuses returned by successive `GetChange` calls.
    pub async fn script_statuses(&self, statuses: Vec<ChangeStatus>) {
        self.statuses.write().await.extend(statuses);
    }

    /// Errors returned by the next `ChangeResourceRecordSets` calls, one per call.
    pub async fn fail_next_changes(&self, errors: Vec<ProviderError>) {
        self.change_errors.write().await.extend(errors);
    }

    pub async fn fail_next_get_change(&self, error: ProviderError) {
        self.get_change_errors.write().await.push_back(error);
    }

    /// Error returned by the next `ListResourceRecordSets` call.
    pub async fn fail_next_list(&self, error: ProviderError) {
        self.list_errors.write().await.push_back(error);
    }

    pub async fn calls(&self) -> Vec<FakeCall> {
        self.calls.read().await.clone()
    }

    async fn log(&self, call: FakeCall) {
        self.calls.write().await.push(call);
    }

    fn apply(zone: &mut ZoneRecords, batch: &ChangeBatch) -> std::result::Result<(), String> {
        for change in &batch.changes {
            let (key, set) = normalize(change.record_set.clone());
            let label = format!("[name='{}', type='{}']", key.0, key.1);
            match change.action {
                ChangeAction::Create => {
                    if zone.contains_key(&key) {
                        return Err(format!(
                            "Tried to create resource record set {label} but it already exists"
                        ));
                    }
                    zone.insert(key, set);
                }
                ChangeAction::Delete => match zone.get(&key) {
                    Some(existing) if *existing == set => {
                        zone.remove(&key);
                    }
                    Some(_) => {
                        return Err(format!(
                            "Tried to delete resource record set {label} but the values provided do not match the current values"
                        ));
                    }
                    None => {
                        return Err(format!(
                            "Tried to delete resource record set {label} but it was not found"
                        ));
                    }
                },
                ChangeAction::Upsert => {
                    zone.insert(key, set);
                }
            }
        }
        Ok(())
    }
}

fn key_of(name: &str, record_type: &str, set_identifier: Option<&str>) -> RecordKey {
    (
        fqdn(&clean_record_name(name).to_lowercase()),
        record_type.to_uppercase(),
        set_identifier.unwrap_or_default().to_string(),
    )
}

fn normalize(mut set: ResourceRecordSet) -> (RecordKey, ResourceRecordSet) {
    let key = key_of(&set.name, &set.record_type, set.set_identifier.as_deref());
    set.name.clone_from(&key.0);
    set.record_type.clone_from(&key.1);
    (key, set)
}

fn escape_name(name: &str) -> String {
    name.replace('*', "\\052")
}

#[async_trait]
impl Route53Api for FakeRoute53 {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZone> {
        self.log(FakeCall::GetHostedZone(zone_id.to_string())).await;
        self.zones
            .read()
            .await
            .get(zone_id)
            .cloned()
            .ok_or_else(|| hosted_zone_not_found(zone_id))
    }

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo> {
        self.log(FakeCall::ChangeResourceRecordSets {
            zone_id: zone_id.to_string(),
            batch: batch.clone(),
        })
        .await;

        if let Some(err) = self.change_errors.write().await.pop_front() {
            return Err(err);
        }

        let mut records = self.records.write().await;
        let Some(zone) = records.get_mut(zone_id) else {
            return Err(hosted_zone_not_found(zone_id));
        };

        // 在副本上应用，失败时整批不生效
        let mut staged = zone.clone();
        Self::apply(&mut staged, batch).map_err(invalid_change_batch)?;
        *zone = staged;

        let mut next = self.next_change.write().await;
        let id = format!("C{:04}", *next);
        *next += 1;

        Ok(ChangeInfo {
            id,
            status: ChangeStatus::Pending,
            submitted_at: None,
            comment: batch.comment.clone(),
        })
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        self.log(FakeCall::GetChange(change_id.to_string())).await;

        if let Some(err) = self.get_change_errors.write().await.pop_front() {
            return Err(err);
        }
        let status = self
            .statuses
            .write()
            .await
            .pop_front()
            .unwrap_or(ChangeStatus::Insync);

        Ok(ChangeInfo {
            id: change_id.to_string(),
            status,
            submitted_at: None,
            comment: None,
        })
    }

    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        query: &RecordSetQuery,
    ) -> Result<RecordSetPage> {
        self.log(FakeCall::ListResourceRecordSets {
            zone_id: zone_id.to_string(),
            query: query.clone(),
        })
        .await;

        if let Some(err) = self.list_errors.write().await.pop_front() {
            return Err(err);
        }

        let records = self.records.read().await;
        let Some(zone) = records.get(zone_id) else {
            return Err(hosted_zone_not_found(zone_id));
        };

        let start: RecordKey = (
            query
                .start_name
                .as_deref()
                .map(|n| fqdn(&clean_record_name(n).to_lowercase()))
                .unwrap_or_default(),
            query.start_type.clone().unwrap_or_default(),
            query.start_identifier.clone().unwrap_or_default(),
        );

        let mut entries: Vec<(&RecordKey, &ResourceRecordSet)> =
            zone.range(start..).take(self.page_size + 1).collect();
        let next = if entries.len() > self.page_size {
            entries.pop().map(|(key, _)| key.clone())
        } else {
            None
        };

        Ok(RecordSetPage {
            record_sets: entries
                .into_iter()
                .map(|(_, set)| ResourceRecordSet {
                    name: escape_name(&set.name),
                    ..set.clone()
                })
                .collect(),
            is_truncated: next.is_some(),
            next_record_name: next.as_ref().map(|k| escape_name(&k.0)),
            next_record_type: next.as_ref().map(|k| k.1.clone()),
            next_record_identifier: next
                .as_ref()
                .map(|k| k.2.clone())
                .filter(|id| !id.is_empty()),
        })
    }
}

impl Default for FakeRoute53 {
    fn default() -> Self {
        Self::new()
    }
}

// ===== 错误构造 =====

pub fn hosted_zone_not_found(zone_id: &str) -> ProviderError {
    ProviderError::HostedZoneNotFound {
        provider: PROVIDER.to_string(),
        zone_id: zone_id.to_string(),
        raw_message: Some(format!("No hosted zone found with ID: {zone_id}")),
    }
}

pub fn invalid_change_batch(message: impl Into<String>) -> ProviderError {
    ProviderError::InvalidChangeBatch {
        provider: PROVIDER.to_string(),
        messages: vec![message.into()],
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`（默认时间参数）
pub fn create_test_context(fake: Arc<FakeRoute53>) -> Arc<ServiceContext> {
    create_test_context_with(fake, SyncSettings::default())
}

/// 创建测试用 `ServiceContext`
pub fn create_test_context_with(
    fake: Arc<FakeRoute53>,
    settings: SyncSettings,
) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(fake, settings))
}
