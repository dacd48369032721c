use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Record Types ============

/// DNS record types accepted for a managed Route53 record set.
///
/// Matching against user input is case-sensitive: `"cname"` is not a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    Soa,
    A,
    Txt,
    Ns,
    Cname,
    Mx,
    Naptr,
    Ptr,
    Srv,
    Spf,
    Aaaa,
    Caa,
    Ds,
}

impl RecordType {
    /// Every supported record type, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Soa,
        Self::A,
        Self::Txt,
        Self::Ns,
        Self::Cname,
        Self::Mx,
        Self::Naptr,
        Self::Ptr,
        Self::Srv,
        Self::Spf,
        Self::Aaaa,
        Self::Caa,
        Self::Ds,
    ];

    /// Wire representation (`"A"`, `"AAAA"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soa => "SOA",
            Self::A => "A",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Naptr => "NAPTR",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Spf => "SPF",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Ds => "DS",
        }
    }

    /// Parse an exact (upper-case) type token. Returns `None` for anything else.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }

    /// TXT and SPF values travel as quoted character-strings.
    pub fn is_quoted_text(self) -> bool {
        matches!(self, Self::Txt | Self::Spf)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Hosted Zone ============

/// A Route53 hosted zone as returned by `GetHostedZone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Zone ID with the `/hostedzone/` prefix removed.
    pub id: String,
    /// Canonical zone name as returned by the API (normally with a trailing dot).
    pub name: String,
    /// Whether this is a private (VPC-associated) zone.
    pub private_zone: bool,
    /// Number of record sets in the zone, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u64>,
    /// Zone comment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ============ Record Sets ============

/// Alias target for an alias record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTarget {
    /// Hosted zone ID of the alias target.
    pub hosted_zone_id: String,
    /// DNS name of the alias target.
    pub dns_name: String,
    /// Whether Route53 should evaluate the target's health.
    pub evaluate_target_health: bool,
}

/// Geolocation routing selector. At least one code is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,
}

/// Role of a record set in a failover pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FailoverRole {
    Primary,
    Secondary,
}

impl FailoverRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PRIMARY" => Some(Self::Primary),
            "SECONDARY" => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Routing policy attached to a record set that carries a set identifier.
///
/// Route53 allows at most one policy per record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum RoutingPolicy {
    Failover { role: FailoverRole },
    Geolocation(GeoLocation),
    Latency { region: String },
    Weighted { weight: u64 },
    MultivalueAnswer,
}

/// A Route53 resource record set.
///
/// `record_type` stays a raw string so listings containing types outside
/// [`RecordType`] still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Record name, fully qualified (Route53 returns it with a trailing dot).
    pub name: String,
    /// Record type token (`"A"`, `"TXT"`, ...).
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingPolicy>,
    /// TTL in seconds. Absent for alias record sets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Record values in wire form.
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

impl ResourceRecordSet {
    /// A plain (non-alias, non-routed) record set.
    pub fn simple(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: i64,
        records: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.as_str().to_string(),
            set_identifier: None,
            routing: None,
            ttl: Some(ttl),
            records,
            alias_target: None,
            health_check_id: None,
        }
    }
}

// ============ Change Batches ============

/// Action applied to a record set inside a change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Delete,
    Upsert,
}

impl ChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Upsert => "UPSERT",
        }
    }
}

/// One entry of a change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub action: ChangeAction,
    pub record_set: ResourceRecordSet,
}

/// An ordered list of changes applied atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    /// A batch with a single change.
    pub fn single(comment: impl Into<String>, action: ChangeAction, record_set: ResourceRecordSet) -> Self {
        Self {
            comment: Some(comment.into()),
            changes: vec![Change { action, record_set }],
        }
    }
}

/// Propagation status of a submitted change. `Insync` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    Pending,
    Insync,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Insync => "INSYNC",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "INSYNC" => Some(Self::Insync),
            _ => None,
        }
    }
}

/// Result of submitting or polling a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Change ID with the `/change/` prefix removed.
    pub id: String,
    pub status: ChangeStatus,
    #[serde(default, with = "crate::utils::datetime")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ============ Listing ============

/// Start position and page size for `ListResourceRecordSets`.
///
/// Route53 lists record sets ordered by (name, type, set identifier); the listing
/// begins at the first record set at or after the start key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_name: Option<String>,
    /// Only honored by the API together with `start_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_type: Option<String>,
    /// Only honored by the API together with `start_type`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
}

/// One page of a record set listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSetPage {
    pub record_sets: Vec<ResourceRecordSet>,
    pub is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_record_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_record_identifier: Option<String>,
}

impl RecordSetPage {
    /// Query continuing the listing after this page, or `None` on the last page.
    pub fn next_query(&self, max_items: Option<u32>) -> Option<RecordSetQuery> {
        if !self.is_truncated {
            return None;
        }
        Some(RecordSetQuery {
            start_name: self.next_record_name.clone(),
            start_type: self.next_record_type.clone(),
            start_identifier: self.next_record_identifier.clone(),
            max_items,
        })
    }
}

// ============ Credential Types ============

/// Validation error for AWS credentials.
///
/// Returned when credential fields are missing or empty.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// AWS access credentials used for SigV4 request signing.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Construct credentials from a `HashMap`, validating required fields.
    ///
    /// Keys: `accessKeyId`, `secretAccessKey`, optional `sessionToken`.
    pub fn from_map(
        map: &std::collections::HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            access_key_id: Self::get_required_field(map, "accessKeyId", "Access Key ID")?,
            secret_access_key: Self::get_required_field(
                map,
                "secretAccessKey",
                "Secret Access Key",
            )?,
            session_token: map
                .get("sessionToken")
                .filter(|v| !v.trim().is_empty())
                .cloned(),
        })
    }

    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Result<Self, CredentialValidationError> {
        let mut map = std::collections::HashMap::new();
        for (var, key) in [
            ("AWS_ACCESS_KEY_ID", "accessKeyId"),
            ("AWS_SECRET_ACCESS_KEY", "secretAccessKey"),
            ("AWS_SESSION_TOKEN", "sessionToken"),
        ] {
            if let Ok(value) = std::env::var(var) {
                map.insert(key.to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> std::collections::HashMap<String, String> {
        let mut map: std::collections::HashMap<String, String> = [
            ("accessKeyId".to_string(), self.access_key_id.clone()),
            ("secretAccessKey".to_string(), self.secret_access_key.clone()),
        ]
        .into();
        if let Some(token) = &self.session_token {
            map.insert("sessionToken".to_string(), token.clone());
        }
        map
    }

    fn get_required_field(
        map: &std::collections::HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }
}
