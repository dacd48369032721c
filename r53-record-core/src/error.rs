//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use r53_record_provider::{CredentialValidationError, ProviderError};

/// Explanation attached to an import ID that cannot be parsed.
pub const IMPORT_ID_FORMAT: &str = "Please make sure the record ID is in the form \
ZONEID_RECORDNAME_TYPE_SET-IDENTIFIER (e.g. Z4KAPRWWNC7JR_dev.example.com_NS_dev), \
where SET-IDENTIFIER is optional";

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Hosted zone does not exist
    #[error("No Route53 zone found for id ({0})")]
    ZoneNotFound(String),

    /// Record set does not exist in the zone
    #[error("No matching Route53 record found: {0}")]
    RecordNotFound(String),

    /// Change did not reach `INSYNC` in time
    #[error("Timeout while waiting for change {change_id} to become INSYNC (waited {waited_secs}s)")]
    ConvergenceTimeout { change_id: String, waited_secs: u64 },

    /// Import ID could not be split into zone / name / type
    #[error("Error importing Route53 record '{0}'. {IMPORT_ID_FORMAT}")]
    MalformedImportId(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ZoneNotFound(_)
            | Self::RecordNotFound(_)
            | Self::MalformedImportId(_)
            | Self::Validation(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::ConvergenceTimeout { .. } => false,
        }
    }

    /// Zone 或记录不存在（Read / Delete 视为软错误）
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ZoneNotFound(_) | Self::RecordNotFound(_))
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_import_id_explains_format() {
        let err = CoreError::MalformedImportId("Z1_bad".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Z1_bad"));
        assert!(msg.contains("ZONEID_RECORDNAME_TYPE_SET-IDENTIFIER"));
        assert!(err.is_expected());
    }

    #[test]
    fn not_found_variants_are_soft() {
        assert!(CoreError::ZoneNotFound("Z1".to_string()).is_not_found());
        assert!(CoreError::RecordNotFound("www".to_string()).is_not_found());
        assert!(!CoreError::Validation("x".to_string()).is_not_found());
    }

    #[test]
    fn convergence_timeout_is_unexpected() {
        let err = CoreError::ConvergenceTimeout {
            change_id: "C1".to_string(),
            waited_secs: 1800,
        };
        assert!(!err.is_expected());
        assert!(err.to_string().contains("C1"));
    }

    #[test]
    fn serializes_with_code_tag() {
        let err = CoreError::ZoneNotFound("Z1".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "ZoneNotFound");
        assert_eq!(json["details"], "Z1");
    }
}
