//! Route53 HTTP 请求方法

use chrono::Utc;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpUtils, RawResponse};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::Route53Client;
use super::sign::canonical_query;
use super::types::{ErrorResponse, InvalidChangeBatchResponse};

impl Route53Client {
    // ==================== 辅助方法 ====================

    /// 统一处理 Route53 响应错误
    fn handle_response_error(&self, response: &RawResponse, mut ctx: ErrorContext) -> Result<()> {
        if (200..300).contains(&response.status) {
            return Ok(());
        }
        ctx.retry_after = response.retry_after;

        // InvalidChangeBatch 使用独立的根元素
        if response.body.contains("<InvalidChangeBatch") {
            if let Ok(batch) = HttpUtils::parse_xml::<InvalidChangeBatchResponse>(
                &response.body,
                self.provider_name(),
            ) {
                return Err(self.map_error(RawApiError::change_batch(batch.messages.items), ctx));
            }
        }

        if let Ok(error) = quick_xml::de::from_str::<ErrorResponse>(&response.body) {
            return Err(self.map_error(
                RawApiError::with_code(error.error.code, error.error.message.unwrap_or_default()),
                ctx,
            ));
        }

        // 回退到通用错误
        Err(self.unknown_error(RawApiError::new(format!(
            "HTTP {}: {}",
            response.status,
            truncate_for_log(&response.body)
        ))))
    }

    /// 签名并发送一次请求
    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &str,
        payload: &str,
        ctx: ErrorContext,
    ) -> Result<String> {
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let signed = self.sign(method.as_str(), path, query, payload, &amz_date);

        let url = if query.is_empty() {
            format!("{}{path}", self.endpoint)
        } else {
            format!("{}{path}?{query}", self.endpoint)
        };

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("x-amz-date", &signed.amz_date)
            .header("Authorization", &signed.authorization);
        if let Some(token) = &signed.security_token {
            request = request.header("x-amz-security-token", token);
        }
        if !payload.is_empty() {
            request = request
                .header("Content-Type", "text/xml")
                .body(payload.to_string());
        }

        let response =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), &url)
                .await?;
        self.handle_response_error(&response, ctx)?;
        Ok(response.body)
    }

    /// 发送请求（带重试，每次重试重新签名）
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &str,
        payload: &str,
        ctx: ErrorContext,
    ) -> Result<String> {
        let label = format!("{method} {path}");
        HttpUtils::with_retry(self.provider_name(), &label, self.max_retries, || {
            self.send_once(method.clone(), path, query, payload, ctx.clone())
        })
        .await
    }

    // ==================== 公开 API 方法 ====================

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        ctx: ErrorContext,
    ) -> Result<T> {
        let query = canonical_query(params);
        let body = self.send(Method::GET, path, &query, "", ctx).await?;
        HttpUtils::parse_xml(&body, self.provider_name())
    }

    /// 执行 POST 请求（XML body）
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload =
            quick_xml::se::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        log::debug!("Request Body: {}", truncate_for_log(&payload));

        let response = self.send(Method::POST, path, "", &payload, ctx).await?;
        HttpUtils::parse_xml(&response, self.provider_name())
    }
}
