//! Tag search tool.
//!
//! Searches malicious URLs by tag via `POST /tag/`.

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
    QUERY_OK, effective_limit, lenient_limit, list_envelope, query_status, required_field,
    truncated_list, upstream_failure,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the tag search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetUrlsByTagParams {
    /// The tag to search for.
    #[schemars(description = "Tag to search for (e.g. 'Mozi', 'emotet')")]
    pub tag: String,

    /// Maximum number of URLs to return (default: 100, max: 1000).
    #[schemars(description = "Maximum number of URLs to return (default: 100, max: 1000)")]
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<u64>,
}

/// Tag search tool - lists malicious URLs carrying a given tag.
pub struct GetUrlsByTagTool;

impl GetUrlsByTagTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_urls_by_tag";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search URLhaus for malicious URLs carrying a given tag (e.g. 'Mozi', 'emotet'). Returns up to 'limit' matching URL records (default: 100, max: 1000).";

    #[instrument(skip_all, fields(tag = %params.tag))]
    pub async fn execute(
        params: &GetUrlsByTagParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let tag = required_field(&params.tag, "tag")?;
        let limit = effective_limit(params.limit);
        info!("Searching URLs by tag (limit={})", limit);

        let body = match client.urls_by_tag(&tag, limit).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(&body, &tag, limit))
    }

    fn shape_result(body: &Value, tag: &str, limit: u64) -> CallToolResult {
        let status = query_status(body);
        let (urls, total) = truncated_list(body, "urls", limit);

        let summary = if status == QUERY_OK {
            format!("Found {} URL(s) tagged '{}'", total, tag)
        } else {
            format!("No URLs found for tag '{}' (query status: {})", tag, status)
        };

        list_envelope(status, summary, "urls", urls, total)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetUrlsByTagParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<GetUrlsByTagParams>(),
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
                let params: GetUrlsByTagParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Self::execute(&params, &client).await
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UpstreamConfig;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_params_limit_defaults_to_none() {
        let params: GetUrlsByTagParams = serde_json::from_value(json!({"tag": "Mozi"})).unwrap();
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_missing_tag_is_invalid_params_fault() {
        let client = UrlhausClient::new(&UpstreamConfig::default()).unwrap();
        let params = GetUrlsByTagParams {
            tag: " ".to_string(),
            limit: None,
        };

        let err = tokio_test::block_on(GetUrlsByTagTool::execute(&params, &client)).unwrap_err();
        assert!(err.message.contains("tag"));
    }

    #[test]
    fn test_shape_result_found() {
        let body = json!({
            "query_status": "ok",
            "urls": [{"id": "1"}, {"id": "2"}],
        });
        let result = GetUrlsByTagTool::shape_result(&body, "Mozi", 100);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(parsed["summary"], "Found 2 URL(s) tagged 'Mozi'");
        assert_eq!(parsed["urls_count"], 2);
    }

    #[test]
    fn test_shape_result_no_results() {
        let body = json!({"query_status": "no_results"});
        let result = GetUrlsByTagTool::shape_result(&body, "nonexistent", 100);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert!(
            parsed["summary"]
                .as_str()
                .unwrap()
                .contains("No URLs found for tag 'nonexistent'")
        );
    }
}
