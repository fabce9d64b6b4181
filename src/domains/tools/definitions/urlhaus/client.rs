//! URLhaus API client.
//!
//! A thin wrapper around a reusable `reqwest::Client` that knows the URLhaus
//! endpoint layout: query-parameter GETs for the two recent feeds, and
//! form-encoded POSTs for every lookup keyed by an identifying field.
//!
//! The client owns the central HTTP-status error branch. Handlers never
//! inspect status codes themselves; they receive either the decoded JSON
//! body or an [`UpstreamError`] classifying the failure.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::config::UpstreamConfig;
use crate::core::{Error, Result};

/// Errors surfaced by the URLhaus client.
///
/// The three variants map one-to-one onto the error taxonomy the tool layer
/// needs: rate limiting and upstream failures become error-flagged text
/// results, while transport failures propagate as protocol faults.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered HTTP 429.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The upstream answered any other non-2xx status. Carries the
    /// upstream's own `query_status` field when the body yielded one.
    #[error("HTTP {code}")]
    Status {
        code: u16,
        query_status: Option<String>,
    },

    /// Timeout, DNS/connection failure, or an undecodable success body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Reusable URLhaus API client.
///
/// Constructed once at startup and shared immutably across all tool calls;
/// `reqwest::Client` is internally reference-counted and safe for concurrent
/// reuse.
#[derive(Debug, Clone)]
pub struct UrlhausClient {
    http: reqwest::Client,
    base_url: String,
}

impl UrlhausClient {
    /// Build a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("urlhaus-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client is pointed at (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /urls/recent/?limit=N`
    pub async fn recent_urls(&self, limit: u64) -> std::result::Result<Value, UpstreamError> {
        self.get("urls/recent", limit).await
    }

    /// `GET /payloads/recent/?limit=N`
    pub async fn recent_payloads(&self, limit: u64) -> std::result::Result<Value, UpstreamError> {
        self.get("payloads/recent", limit).await
    }

    /// `POST /url/` with form field `url`.
    pub async fn lookup_url(&self, url: &str) -> std::result::Result<Value, UpstreamError> {
        self.post_form("url", &[("url", url)]).await
    }

    /// `POST /host/` with form field `host`.
    pub async fn lookup_host(&self, host: &str) -> std::result::Result<Value, UpstreamError> {
        self.post_form("host", &[("host", host)]).await
    }

    /// `POST /payload/` with form field `hash`.
    pub async fn lookup_payload(&self, hash: &str) -> std::result::Result<Value, UpstreamError> {
        self.post_form("payload", &[("hash", hash)]).await
    }

    /// `POST /tag/` with form fields `tag` and `limit`.
    pub async fn urls_by_tag(
        &self,
        tag: &str,
        limit: u64,
    ) -> std::result::Result<Value, UpstreamError> {
        let limit = limit.to_string();
        self.post_form("tag", &[("tag", tag), ("limit", limit.as_str())])
            .await
    }

    /// `POST /signature/` with form fields `signature` and `limit`.
    pub async fn urls_by_signature(
        &self,
        signature: &str,
        limit: u64,
    ) -> std::result::Result<Value, UpstreamError> {
        let limit = limit.to_string();
        self.post_form(
            "signature",
            &[("signature", signature), ("limit", limit.as_str())],
        )
        .await
    }

    /// Absolute endpoint address for an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }

    async fn get(&self, path: &str, limit: u64) -> std::result::Result<Value, UpstreamError> {
        let endpoint = self.endpoint(path);
        debug!("GET {} (limit={})", endpoint, limit);

        let response = self
            .http
            .get(&endpoint)
            .query(&[("limit", limit)])
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> std::result::Result<Value, UpstreamError> {
        let endpoint = self.endpoint(path);
        debug!("POST {}", endpoint);

        let response = self.http.post(&endpoint).form(form).send().await?;

        Self::decode(response).await
    }

    /// Classify the HTTP status and decode the body.
    ///
    /// This is the single shared branch on the upstream status code. A 429
    /// becomes [`UpstreamError::RateLimited`]; any other non-2xx becomes
    /// [`UpstreamError::Status`], pulling the upstream's own `query_status`
    /// out of the body when one is present.
    async fn decode(response: reqwest::Response) -> std::result::Result<Value, UpstreamError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }

        if !status.is_success() {
            let query_status = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(|body| body.get("query_status"))
                .and_then(Value::as_str)
                .map(str::to_string);

            return Err(UpstreamError::Status {
                code: status.as_u16(),
                query_status,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::URLHAUS_API_URL;

    fn test_client() -> UrlhausClient {
        UrlhausClient::new(&UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn test_default_base_url() {
        let client = test_client();
        assert_eq!(client.base_url(), URLHAUS_API_URL);
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = UpstreamConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            timeout_secs: 30,
        };
        let client = UrlhausClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/v1");
        assert_eq!(client.endpoint("url"), "http://localhost:9000/v1/url/");
    }

    #[test]
    fn test_endpoint_layout() {
        let client = test_client();
        assert_eq!(
            client.endpoint("urls/recent"),
            format!("{URLHAUS_API_URL}/urls/recent/")
        );
        assert_eq!(
            client.endpoint("signature"),
            format!("{URLHAUS_API_URL}/signature/")
        );
    }

    // Integration test (requires network, run with: cargo test -- --ignored)
    #[ignore]
    #[tokio::test]
    async fn test_recent_urls_live() {
        let client = test_client();
        let body = client.recent_urls(3).await.unwrap();
        assert!(body.get("query_status").is_some());
    }
}
