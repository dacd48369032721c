//! 记录配置、期望状态与持久化状态

use serde::{Deserialize, Serialize};

use r53_record_provider::{
    AliasTarget, FailoverRole, GeoLocation, RecordType, ResourceRecordSet, RoutingPolicy,
};

use crate::error::{CoreError, CoreResult};
use crate::utils::names::{expand_record_values, flatten_record_values, normalize_alias_name};

use super::identity::RecordIdentity;

// ===== 用户输入 =====

/// Alias block of a record configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub zone_id: String,
    pub name: String,
    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailoverPolicyConfig {
    #[serde(rename = "type")]
    pub failover_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeolocationPolicyConfig {
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub subdivision: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyPolicyConfig {
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedPolicyConfig {
    pub weight: u64,
}

/// Declared record as written by the user.
///
/// Field names follow the `aws_route53_record` schema. Call
/// [`RecordConfig::validate`] to obtain a [`DesiredRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub zone_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: Option<i64>,
    pub records: Option<Vec<String>>,
    pub alias: Option<AliasConfig>,
    pub set_identifier: Option<String>,
    pub failover_routing_policy: Option<FailoverPolicyConfig>,
    pub geolocation_routing_policy: Option<GeolocationPolicyConfig>,
    pub latency_routing_policy: Option<LatencyPolicyConfig>,
    pub weighted_routing_policy: Option<WeightedPolicyConfig>,
    pub multivalue_answer_routing_policy: Option<bool>,
    pub health_check_id: Option<String>,
    pub allow_overwrite: bool,
}

// ===== 期望状态 =====

/// What a record set answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Plain values with an optional TTL (values in user form, TXT unquoted).
    Records { ttl: Option<i64>, values: Vec<String> },
    Alias(AliasTarget),
}

/// Set identifier plus the single routing policy it qualifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub set_identifier: String,
    pub policy: RoutingPolicy,
}

/// Validated record declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecord {
    /// Hosted zone ID without the `/hostedzone/` prefix.
    pub zone_id: String,
    /// Lower-cased, trailing dot trimmed; relative or absolute.
    pub name: String,
    pub record_type: RecordType,
    pub target: RecordTarget,
    pub routing: Option<Routing>,
    pub health_check_id: Option<String>,
    pub allow_overwrite: bool,
}

impl DesiredRecord {
    pub fn set_identifier(&self) -> Option<&str> {
        self.routing.as_ref().map(|r| r.set_identifier.as_str())
    }

    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(
            self.zone_id.clone(),
            &self.name,
            self.record_type,
            self.set_identifier(),
        )
    }

    /// Wire record set for this declaration, given the already expanded name.
    pub fn to_record_set(&self, expanded_name: &str) -> ResourceRecordSet {
        let (ttl, records, alias_target) = match &self.target {
            RecordTarget::Records { ttl, values } => (
                *ttl,
                expand_record_values(values, self.record_type),
                None,
            ),
            RecordTarget::Alias(alias) => (None, Vec::new(), Some(alias.clone())),
        };
        ResourceRecordSet {
            name: expanded_name.to_string(),
            record_type: self.record_type.as_str().to_string(),
            set_identifier: self.routing.as_ref().map(|r| r.set_identifier.clone()),
            routing: self.routing.as_ref().map(|r| r.policy.clone()),
            ttl,
            records,
            alias_target,
            health_check_id: self.health_check_id.clone(),
        }
    }
}

impl RecordConfig {
    /// Check the declaration once at the boundary.
    pub fn validate(&self) -> CoreResult<DesiredRecord> {
        let zone_id = r53_record_provider::clean_zone_id(self.zone_id.trim());
        if zone_id.is_empty() {
            return Err(invalid("zone_id must not be empty"));
        }

        let record_type = RecordType::parse(&self.record_type).ok_or_else(|| {
            invalid(format!(
                "type '{}' is not a supported record type (expected one of: {})",
                self.record_type,
                RecordType::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let name = normalize_name(&self.name);
        let target = self.validate_target()?;
        let routing = self.validate_routing()?;

        Ok(DesiredRecord {
            zone_id,
            name,
            record_type,
            target,
            routing,
            health_check_id: self.health_check_id.clone().filter(|s| !s.is_empty()),
            allow_overwrite: self.allow_overwrite,
        })
    }

    fn validate_target(&self) -> CoreResult<RecordTarget> {
        let Some(alias) = &self.alias else {
            let mut values: Vec<String> = Vec::new();
            // records 是集合语义
            for v in self.records.iter().flatten() {
                if !values.contains(v) {
                    values.push(v.clone());
                }
            }
            return Ok(RecordTarget::Records {
                ttl: self.ttl,
                values,
            });
        };

        if self.ttl.is_some() {
            return Err(invalid("\"alias\": conflicts with ttl"));
        }
        if self.records.is_some() {
            return Err(invalid("\"alias\": conflicts with records"));
        }
        if !(1..=32).contains(&alias.zone_id.len()) {
            return Err(invalid("alias zone_id must be between 1 and 32 characters"));
        }
        if !(1..=1024).contains(&alias.name.len()) {
            return Err(invalid("alias name must be between 1 and 1024 characters"));
        }

        Ok(RecordTarget::Alias(AliasTarget {
            hosted_zone_id: alias.zone_id.clone(),
            dns_name: alias.name.clone(),
            evaluate_target_health: alias.evaluate_target_health,
        }))
    }

    fn validate_routing(&self) -> CoreResult<Option<Routing>> {
        let mut policies: Vec<(&str, RoutingPolicy)> = Vec::new();

        if let Some(failover) = &self.failover_routing_policy {
            let role = FailoverRole::parse(&failover.failover_type).ok_or_else(|| {
                invalid("Failover policy type must be PRIMARY or SECONDARY")
            })?;
            policies.push(("failover_routing_policy", RoutingPolicy::Failover { role }));
        }
        if let Some(geo) = &self.geolocation_routing_policy {
            policies.push((
                "geolocation_routing_policy",
                RoutingPolicy::Geolocation(GeoLocation {
                    continent_code: non_empty(geo.continent.as_deref()),
                    country_code: non_empty(geo.country.as_deref()),
                    subdivision_code: non_empty(geo.subdivision.as_deref()),
                }),
            ));
        }
        if let Some(latency) = &self.latency_routing_policy {
            policies.push((
                "latency_routing_policy",
                RoutingPolicy::Latency {
                    region: latency.region.clone(),
                },
            ));
        }
        if let Some(weighted) = &self.weighted_routing_policy {
            policies.push((
                "weighted_routing_policy",
                RoutingPolicy::Weighted {
                    weight: weighted.weight,
                },
            ));
        }
        // false 与未设置等价
        if self.multivalue_answer_routing_policy == Some(true) {
            policies.push((
                "multivalue_answer_routing_policy",
                RoutingPolicy::MultivalueAnswer,
            ));
        }

        if policies.len() > 1 {
            let names: Vec<&str> = policies.iter().map(|(n, _)| *n).collect();
            return Err(invalid(format!(
                "only one routing policy may be set, got: {}",
                names.join(", ")
            )));
        }

        let set_identifier = non_empty(self.set_identifier.as_deref());
        match (policies.pop(), set_identifier) {
            (None, None) => Ok(None),
            (Some((field, _)), None) => Err(invalid(format!(
                "\"set_identifier\": required field is not set when \"{field}\" is set"
            ))),
            (None, Some(_)) => Err(invalid(
                "\"set_identifier\" requires one of the routing policies to be set",
            )),
            (Some((_, policy)), Some(set_identifier)) => Ok(Some(Routing {
                set_identifier,
                policy,
            })),
        }
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::Validation(msg.into())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// 名称进入状态前：去掉末尾的点并转小写
pub fn normalize_name(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_lowercase()
}

// ===== 持久化状态 =====

/// Persisted record state handed back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordState {
    /// Composite identity, see [`RecordIdentity`].
    pub id: String,
    pub zone_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Expanded record name (no trailing dot).
    pub fqdn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Values in user form (TXT unquoted).
    #[serde(default)]
    pub records: Vec<String>,
    /// Alias target with the DNS name normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<AliasTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
    #[serde(default)]
    pub allow_overwrite: bool,
}

impl RecordState {
    /// Build state from a record set found in the zone.
    pub fn from_record_set(
        identity: &RecordIdentity,
        record_type: RecordType,
        fqdn: String,
        set: &ResourceRecordSet,
        allow_overwrite: bool,
    ) -> Self {
        Self {
            id: identity.to_string(),
            zone_id: identity.zone_id.clone(),
            name: identity.name.clone(),
            record_type,
            fqdn,
            ttl: set.ttl,
            records: flatten_record_values(&set.records, record_type),
            alias: set.alias_target.as_ref().map(|alias| AliasTarget {
                hosted_zone_id: alias.hosted_zone_id.clone(),
                dns_name: normalize_alias_name(&alias.dns_name),
                evaluate_target_health: alias.evaluate_target_health,
            }),
            set_identifier: set.set_identifier.clone(),
            routing: set.routing.clone(),
            health_check_id: set.health_check_id.clone(),
            allow_overwrite,
        }
    }

    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(
            self.zone_id.clone(),
            &self.name,
            self.record_type,
            self.set_identifier.as_deref(),
        )
    }

    /// Record set as last persisted, for a DELETE that Route53 must match exactly.
    pub fn to_record_set(&self, expanded_name: &str) -> ResourceRecordSet {
        ResourceRecordSet {
            name: expanded_name.to_string(),
            record_type: self.record_type.as_str().to_string(),
            set_identifier: self.set_identifier.clone(),
            routing: self.routing.clone(),
            ttl: self.ttl,
            records: expand_record_values(&self.records, self.record_type),
            alias_target: self.alias.clone(),
            health_check_id: self.health_check_id.clone(),
        }
    }
}
