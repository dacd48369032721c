//! Route53 `Route53Api` trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ErrorContext, ProviderErrorMapper, Route53Api};
use crate::types::{
    ChangeBatch, ChangeInfo, ChangeStatus, HostedZone, RecordSetPage, RecordSetQuery,
    ResourceRecordSet,
};
use crate::utils::datetime::parse_timestamp;
use crate::utils::ids::{clean_change_id, clean_zone_id};

use super::types::{
    ChangeInfoResponse, ChangeInfoXml, ChangeResourceRecordSetsRequest, GetHostedZoneResponse,
    ListResourceRecordSetsResponse,
};
use super::{ROUTE53_API_VERSION, Route53Client};

impl Route53Client {
    /// 将 XML `ChangeInfo` 转换为统一类型
    fn convert_change_info(&self, info: ChangeInfoXml) -> Result<ChangeInfo> {
        let status = ChangeStatus::parse(&info.status)
            .ok_or_else(|| self.parse_error(format!("unknown change status: {}", info.status)))?;
        Ok(ChangeInfo {
            id: clean_change_id(&info.id),
            status,
            submitted_at: info.submitted_at.as_deref().and_then(parse_timestamp),
            comment: info.comment,
        })
    }
}

#[async_trait]
impl Route53Api for Route53Client {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn get_hosted_zone(&self, zone_id: &str) -> Result<HostedZone> {
        let zone_id = clean_zone_id(zone_id);
        let path = format!("/{ROUTE53_API_VERSION}/hostedzone/{zone_id}");

        let response: GetHostedZoneResponse =
            self.get(&path, &[], ErrorContext::zone(&zone_id)).await?;

        Ok(response.hosted_zone.into())
    }

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo> {
        let zone_id = clean_zone_id(zone_id);
        let path = format!("/{ROUTE53_API_VERSION}/hostedzone/{zone_id}/rrset/");
        let body = ChangeResourceRecordSetsRequest::from(batch);

        log::info!(
            "[route53] Submitting {} change(s) to zone {zone_id}",
            batch.changes.len()
        );

        let response: ChangeInfoResponse = self
            .post(&path, &body, ErrorContext::zone(&zone_id))
            .await?;

        self.convert_change_info(response.change_info)
    }

    async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let change_id = clean_change_id(change_id);
        let path = format!("/{ROUTE53_API_VERSION}/change/{change_id}");

        let response: ChangeInfoResponse = self
            .get(&path, &[], ErrorContext::change(&change_id))
            .await?;

        self.convert_change_info(response.change_info)
    }

    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        query: &RecordSetQuery,
    ) -> Result<RecordSetPage> {
        let zone_id = clean_zone_id(zone_id);
        let path = format!("/{ROUTE53_API_VERSION}/hostedzone/{zone_id}/rrset");

        // type 需要 name，identifier 需要 type
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(name) = &query.start_name {
            params.push(("name", name.clone()));
            if let Some(record_type) = &query.start_type {
                params.push(("type", record_type.clone()));
                if let Some(identifier) = &query.start_identifier {
                    params.push(("identifier", identifier.clone()));
                }
            }
        }
        if let Some(max_items) = query.max_items {
            params.push(("maxitems", max_items.to_string()));
        }

        let response: ListResourceRecordSetsResponse = self
            .get(&path, &params, ErrorContext::zone(&zone_id))
            .await?;

        Ok(RecordSetPage {
            record_sets: response
                .resource_record_sets
                .map(|sets| sets.items.into_iter().map(ResourceRecordSet::from).collect())
                .unwrap_or_default(),
            is_truncated: response.is_truncated,
            next_record_name: response.next_record_name,
            next_record_type: response.next_record_type,
            next_record_identifier: response.next_record_identifier,
        })
    }
}
