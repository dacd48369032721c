//! 工具函数模块

pub mod names;

pub use names::{
    clean_record_name, expand_record_name, expand_record_values, flatten_record_values, fqdn,
    normalize_alias_name,
};
