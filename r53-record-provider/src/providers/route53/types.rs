//! Route53 API XML type definitions
//!
//! Field order inside request structs follows the API schema sequence; Route53
//! rejects bodies whose elements are out of order.

use serde::{Deserialize, Serialize};

use crate::types::{
    AliasTarget, Change, ChangeBatch, FailoverRole, GeoLocation, HostedZone, ResourceRecordSet,
    RoutingPolicy,
};
use crate::utils::ids::clean_zone_id;

use super::ROUTE53_XMLNS;

// ============ Hosted Zone ============

/// Response payload for `GetHostedZone`.
#[derive(Debug, Deserialize)]
pub struct GetHostedZoneResponse {
    #[serde(rename = "HostedZone")]
    pub hosted_zone: HostedZoneXml,
}

#[derive(Debug, Deserialize)]
pub struct HostedZoneXml {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Config")]
    pub config: Option<HostedZoneConfigXml>,
    #[serde(rename = "ResourceRecordSetCount")]
    pub resource_record_set_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct HostedZoneConfigXml {
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "PrivateZone")]
    pub private_zone: Option<bool>,
}

impl From<HostedZoneXml> for HostedZone {
    fn from(zone: HostedZoneXml) -> Self {
        let (comment, private_zone) = zone
            .config
            .map(|c| (c.comment, c.private_zone.unwrap_or(false)))
            .unwrap_or((None, false));
        Self {
            id: clean_zone_id(&zone.id),
            name: zone.name,
            private_zone,
            record_count: zone.resource_record_set_count,
            comment,
        }
    }
}

// ============ Record Sets ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecordSetXml {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "SetIdentifier", skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    #[serde(rename = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "GeoLocation", skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoLocationXml>,
    #[serde(rename = "Failover", skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,
    #[serde(rename = "MultiValueAnswer", skip_serializing_if = "Option::is_none")]
    pub multi_value_answer: Option<bool>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(rename = "ResourceRecords", skip_serializing_if = "Option::is_none")]
    pub resource_records: Option<ResourceRecordsXml>,
    #[serde(rename = "AliasTarget", skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTargetXml>,
    #[serde(rename = "HealthCheckId", skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecordsXml {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<ResourceRecordXml>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecordXml {
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasTargetXml {
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    #[serde(rename = "EvaluateTargetHealth")]
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocationXml {
    #[serde(rename = "ContinentCode", skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(rename = "CountryCode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "SubdivisionCode", skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,
}

impl From<&ResourceRecordSet> for ResourceRecordSetXml {
    fn from(set: &ResourceRecordSet) -> Self {
        let mut xml = Self {
            name: set.name.clone(),
            record_type: set.record_type.clone(),
            set_identifier: set.set_identifier.clone(),
            weight: None,
            region: None,
            geo_location: None,
            failover: None,
            multi_value_answer: None,
            ttl: set.ttl,
            resource_records: (!set.records.is_empty()).then(|| ResourceRecordsXml {
                items: set
                    .records
                    .iter()
                    .map(|value| ResourceRecordXml {
                        value: value.clone(),
                    })
                    .collect(),
            }),
            alias_target: set.alias_target.as_ref().map(|a| AliasTargetXml {
                hosted_zone_id: a.hosted_zone_id.clone(),
                dns_name: a.dns_name.clone(),
                evaluate_target_health: a.evaluate_target_health,
            }),
            health_check_id: set.health_check_id.clone(),
        };

        match &set.routing {
            Some(RoutingPolicy::Failover { role }) => xml.failover = Some(role.as_str().to_string()),
            Some(RoutingPolicy::Geolocation(geo)) => {
                xml.geo_location = Some(GeoLocationXml {
                    continent_code: geo.continent_code.clone(),
                    country_code: geo.country_code.clone(),
                    subdivision_code: geo.subdivision_code.clone(),
                });
            }
            Some(RoutingPolicy::Latency { region }) => xml.region = Some(region.clone()),
            Some(RoutingPolicy::Weighted { weight }) => xml.weight = Some(*weight),
            Some(RoutingPolicy::MultivalueAnswer) => xml.multi_value_answer = Some(true),
            None => {}
        }

        xml
    }
}

impl From<ResourceRecordSetXml> for ResourceRecordSet {
    fn from(xml: ResourceRecordSetXml) -> Self {
        // Route53 stores at most one policy per record set
        let routing = if let Some(role) = xml.failover.as_deref().and_then(FailoverRole::parse) {
            Some(RoutingPolicy::Failover { role })
        } else if let Some(geo) = xml.geo_location {
            Some(RoutingPolicy::Geolocation(GeoLocation {
                continent_code: geo.continent_code,
                country_code: geo.country_code,
                subdivision_code: geo.subdivision_code,
            }))
        } else if let Some(region) = xml.region {
            Some(RoutingPolicy::Latency { region })
        } else if let Some(weight) = xml.weight {
            Some(RoutingPolicy::Weighted { weight })
        } else if xml.multi_value_answer == Some(true) {
            Some(RoutingPolicy::MultivalueAnswer)
        } else {
            None
        };

        Self {
            name: xml.name,
            record_type: xml.record_type,
            set_identifier: xml.set_identifier,
            routing,
            ttl: xml.ttl,
            records: xml
                .resource_records
                .map(|r| r.items.into_iter().map(|item| item.value).collect())
                .unwrap_or_default(),
            alias_target: xml.alias_target.map(|a| AliasTarget {
                hosted_zone_id: a.hosted_zone_id,
                dns_name: a.dns_name,
                evaluate_target_health: a.evaluate_target_health,
            }),
            health_check_id: xml.health_check_id,
        }
    }
}

// ============ Change Batch ============

/// Request payload for `ChangeResourceRecordSets`.
#[derive(Debug, Serialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest")]
pub struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "@xmlns")]
    pub xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    pub change_batch: ChangeBatchXml,
}

#[derive(Debug, Serialize)]
pub struct ChangeBatchXml {
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "Changes")]
    pub changes: ChangesXml,
}

#[derive(Debug, Serialize)]
pub struct ChangesXml {
    #[serde(rename = "Change")]
    pub items: Vec<ChangeXml>,
}

#[derive(Debug, Serialize)]
pub struct ChangeXml {
    #[serde(rename = "Action")]
    pub action: &'static str,
    #[serde(rename = "ResourceRecordSet")]
    pub resource_record_set: ResourceRecordSetXml,
}

impl From<&Change> for ChangeXml {
    fn from(change: &Change) -> Self {
        Self {
            action: change.action.as_str(),
            resource_record_set: ResourceRecordSetXml::from(&change.record_set),
        }
    }
}

impl From<&ChangeBatch> for ChangeResourceRecordSetsRequest {
    fn from(batch: &ChangeBatch) -> Self {
        Self {
            xmlns: ROUTE53_XMLNS,
            change_batch: ChangeBatchXml {
                comment: batch.comment.clone(),
                changes: ChangesXml {
                    items: batch.changes.iter().map(ChangeXml::from).collect(),
                },
            },
        }
    }
}

/// Response payload shared by `ChangeResourceRecordSets` and `GetChange`.
#[derive(Debug, Deserialize)]
pub struct ChangeInfoResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: ChangeInfoXml,
}

#[derive(Debug, Deserialize)]
pub struct ChangeInfoXml {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SubmittedAt")]
    pub submitted_at: Option<String>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
}

// ============ Listing ============

/// Response payload for `ListResourceRecordSets`.
#[derive(Debug, Deserialize)]
pub struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets")]
    pub resource_record_sets: Option<ResourceRecordSetsXml>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: bool,
    #[serde(rename = "NextRecordName")]
    pub next_record_name: Option<String>,
    #[serde(rename = "NextRecordType")]
    pub next_record_type: Option<String>,
    #[serde(rename = "NextRecordIdentifier")]
    pub next_record_identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceRecordSetsXml {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<ResourceRecordSetXml>,
}

// ============ Errors ============

/// Generic error payload: `<ErrorResponse><Error>...</Error></ErrorResponse>`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: ErrorXml,
}

#[derive(Debug, Deserialize)]
pub struct ErrorXml {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

/// Error payload for a rejected change batch.
#[derive(Debug, Deserialize)]
pub struct InvalidChangeBatchResponse {
    #[serde(rename = "Messages")]
    pub messages: MessagesXml,
}

#[derive(Debug, Deserialize)]
pub struct MessagesXml {
    #[serde(rename = "Message", default)]
    pub items: Vec<String>,
}
