//! r53-record Core Library
//!
//! Reconciles a declared Route53 record set against a hosted zone:
//! - Name / ID normalization (FQDN expansion, escape decoding, composite IDs)
//! - Boundary validation of record declarations
//! - Record Service (Create / Read / Update / Delete / Import)
//! - Change submission with retry and the convergence wait
//!
//! The Route53 API is injected through [`r53_record_provider::Route53Api`], so
//! the engine runs against the real client or an in-memory fake alike.

pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export common types
pub use config::SyncSettings;
pub use error::{CoreError, CoreResult};
pub use services::{RecordService, ServiceContext};
pub use types::{DesiredRecord, RecordConfig, RecordIdentity, RecordState};
