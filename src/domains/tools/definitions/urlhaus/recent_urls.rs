//! Recent URLs feed tool.
//!
//! Fetches the most recently reported malicious URLs from URLhaus via
//! `GET /urls/recent/`.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::client::UrlhausClient;
use super::common::{
    QUERY_OK, effective_limit, lenient_limit, list_envelope, query_status, truncated_list,
    upstream_failure,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the recent URLs feed.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRecentUrlsParams {
    /// Maximum number of URLs to return (default: 100, max: 1000).
    #[schemars(description = "Maximum number of URLs to return (default: 100, max: 1000)")]
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<u64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Recent URLs feed tool - lists recently reported malicious URLs.
pub struct GetRecentUrlsTool;

impl GetRecentUrlsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_recent_urls";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the most recently reported malicious URLs from URLhaus. Returns up to 'limit' recent URL records (default: 100, max: 1000) including threat type, status, and tags.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(limit))]
    pub async fn execute(
        params: &GetRecentUrlsParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let limit = effective_limit(params.limit);
        tracing::Span::current().record("limit", limit);
        info!("Fetching {} recent URLs", limit);

        let body = match client.recent_urls(limit).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(&body, limit))
    }

    /// Wrap the upstream body in the list envelope.
    fn shape_result(body: &Value, limit: u64) -> CallToolResult {
        let status = query_status(body);
        let (urls, total) = truncated_list(body, "urls", limit);

        let summary = if status == QUERY_OK {
            format!("Retrieved {} recent malicious URLs from URLhaus", total)
        } else {
            format!("No recent URLs available (query status: {})", status)
        };

        list_envelope(status, summary, "urls", urls, total)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetRecentUrlsParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let result = Self::execute(&params, &client)
            .await
            .map_err(ToolError::from_mcp)?;

        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetRecentUrlsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(client: Arc<UrlhausClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: GetRecentUrlsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Self::execute(&params, &client).await
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_params_limit_optional() {
        let params: GetRecentUrlsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, None);
        assert_eq!(effective_limit(params.limit), 100);
    }

    #[test]
    fn test_params_limit_coerced_from_string() {
        let params: GetRecentUrlsParams =
            serde_json::from_value(json!({"limit": "250"})).unwrap();
        assert_eq!(params.limit, Some(250));
    }

    #[test]
    fn test_params_garbage_limit_falls_back() {
        let params: GetRecentUrlsParams =
            serde_json::from_value(json!({"limit": "abc"})).unwrap();
        assert_eq!(params.limit, None);
        assert_eq!(effective_limit(params.limit), 100);
    }

    #[test]
    fn test_shape_result_truncates_payload_not_count() {
        let body = json!({
            "query_status": "ok",
            "urls": [{"id": "1"}, {"id": "2"}, {"id": "3"}],
        });
        let result = GetRecentUrlsTool::shape_result(&body, 2);
        assert!(!result.is_error.unwrap_or(false));

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(parsed["urls"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["urls_count"], 3);
        assert!(
            parsed["summary"]
                .as_str()
                .unwrap()
                .contains("3 recent malicious URLs")
        );
    }

    #[test]
    fn test_shape_result_not_ok_status() {
        let body = json!({"query_status": "no_results"});
        let result = GetRecentUrlsTool::shape_result(&body, 100);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(parsed["query_status"], "no_results");
        assert_eq!(parsed["urls_count"], 0);
        assert!(parsed["summary"].as_str().unwrap().contains("no_results"));
    }

    // Integration test (requires network, run with: cargo test -- --ignored)
    #[ignore]
    #[tokio::test]
    async fn test_recent_urls_live() {
        use crate::core::config::UpstreamConfig;

        let client = UrlhausClient::new(&UpstreamConfig::default()).unwrap();
        let params = GetRecentUrlsParams { limit: Some(5) };
        let result = GetRecentUrlsTool::execute(&params, &client).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }
}
