//! 记录复合 ID
//!
//! 格式：`{zoneID}_{lowercaseName}_{type}[_{setIdentifier}]`。
//! 记录名本身可能包含 `_`（如 `_dmarc`），解析时以第一个合法的记录类型为分隔点。

use std::fmt;

use r53_record_provider::RecordType;

/// Stable identity of a managed record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordIdentity {
    pub zone_id: String,
    /// Record name as configured (lower-cased, no trailing dot).
    pub name: String,
    pub record_type: String,
    /// Empty when the record has no routing policy.
    pub set_identifier: String,
}

impl RecordIdentity {
    pub fn new(
        zone_id: impl Into<String>,
        name: &str,
        record_type: RecordType,
        set_identifier: Option<&str>,
    ) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.to_lowercase(),
            record_type: record_type.as_str().to_string(),
            set_identifier: set_identifier.unwrap_or_default().to_string(),
        }
    }

    /// Split a composite ID.
    ///
    /// All four fields are empty when no record type token follows the zone
    /// or the name between them would be empty. The zone apex is the one
    /// exception: its name is written as an empty token (`Z1__A`).
    pub fn parse(id: &str) -> Self {
        let parts: Vec<&str> = id.split('_').collect();
        if parts.len() < 3 {
            return Self::default();
        }

        // 跳过 zone，找到第一个记录类型
        let Some(type_index) = parts
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, token)| RecordType::parse(token).is_some())
            .map(|(i, _)| i)
        else {
            return Self::default();
        };

        let joined = parts[1..type_index].join("_");
        let name = joined.strip_suffix('.').unwrap_or(&joined);
        // 顶点记录：zone 与类型之间恰好一个空 token
        let apex = type_index == 2 && joined.is_empty();
        if name.is_empty() && !apex {
            return Self::default();
        }

        Self {
            zone_id: parts[0].to_string(),
            name: name.to_string(),
            record_type: parts[type_index].to_string(),
            set_identifier: parts[type_index + 1..].join("_"),
        }
    }

    /// Zone and type are present. An empty name is the zone apex.
    pub fn is_complete(&self) -> bool {
        !self.zone_id.is_empty() && !self.record_type.is_empty()
    }

    pub fn set_identifier(&self) -> Option<&str> {
        if self.set_identifier.is_empty() {
            None
        } else {
            Some(&self.set_identifier)
        }
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.zone_id,
            self.name.to_lowercase(),
            self.record_type
        )?;
        if !self.set_identifier.is_empty() {
            write!(f, "_{}", self.set_identifier)?;
        }
        Ok(())
    }
}
