//! 类型定义模块

mod identity;
mod record;

pub use identity::RecordIdentity;
pub use record::{
    normalize_name, AliasConfig, DesiredRecord, FailoverPolicyConfig, GeolocationPolicyConfig,
    LatencyPolicyConfig, RecordConfig, RecordState, RecordTarget, Routing, WeightedPolicyConfig,
};

// Re-export provider 库的公共类型
pub use r53_record_provider::{
    AliasTarget, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus, FailoverRole, GeoLocation,
    HostedZone, RecordType, ResourceRecordSet, RoutingPolicy,
};
