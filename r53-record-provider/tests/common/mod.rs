//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use r53_record_provider::{
    AwsCredentials, ClientOptions, RecordSetQuery, ResourceRecordSet, Route53Api, Route53Client,
    create_client,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 指向 mock server 的客户端（不重试）
pub fn mock_client(endpoint: &str) -> Option<Route53Client> {
    Route53Client::builder(AwsCredentials::new("AKIDEXAMPLE", "test-secret"))
        .endpoint(endpoint)
        .max_retries(0)
        .build()
        .ok()
}

/// 指向 mock server 的客户端（带重试）
pub fn mock_client_with_retries(endpoint: &str, retries: u32) -> Option<Route53Client> {
    Route53Client::builder(AwsCredentials::new("AKIDEXAMPLE", "test-secret"))
        .endpoint(endpoint)
        .max_retries(retries)
        .build()
        .ok()
}

/// 测试上下文 - 封装真实 Route53 客户端和测试 zone
pub struct TestContext {
    pub api: Arc<dyn Route53Api>,
    pub zone_id: String,
}

impl TestContext {
    /// 从环境变量创建测试上下文
    pub fn route53() -> Option<Self> {
        let credentials = AwsCredentials::from_env().ok()?;
        let zone_id = env::var("TEST_ZONE_ID").ok()?;
        let api = create_client(credentials, &ClientOptions::default()).ok()?;
        Some(Self { api, zone_id })
    }

    /// 查找指定 name/type 的 record set
    pub async fn find_record(&self, fqdn: &str, record_type: &str) -> Option<ResourceRecordSet> {
        let query = RecordSetQuery {
            start_name: Some(fqdn.to_string()),
            start_type: Some(record_type.to_string()),
            start_identifier: None,
            max_items: Some(1),
        };
        let page = self
            .api
            .list_resource_record_sets(&self.zone_id, &query)
            .await
            .ok()?;
        page.record_sets
            .into_iter()
            .find(|set| set.name.eq_ignore_ascii_case(fqdn) && set.record_type == record_type)
    }
}
