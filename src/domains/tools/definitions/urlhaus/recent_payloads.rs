//! Recent payloads feed tool.
//!
//! Fetches the most recently observed malware payloads from URLhaus via
//! `GET /payloads/recent/`.

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

/// Parameters for the recent payloads feed.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPayloadsParams {
    /// Maximum number of payloads to return (default: 100, max: 1000).
    #[schemars(description = "Maximum number of payloads to return (default: 100, max: 1000)")]
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<u64>,
}

/// Recent payloads feed tool - lists recently observed malware payloads.
pub struct GetPayloadsTool;

impl GetPayloadsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_payloads";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the most recently observed malware payloads from URLhaus. Returns up to 'limit' recent payload records (default: 100, max: 1000) including hashes, file type, and signature.";

    #[instrument(skip_all)]
    pub async fn execute(
        params: &GetPayloadsParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let limit = effective_limit(params.limit);
        info!("Fetching {} recent payloads", limit);

        let body = match client.recent_payloads(limit).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(&body, limit))
    }

    fn shape_result(body: &Value, limit: u64) -> CallToolResult {
        let status = query_status(body);
        let (payloads, total) = truncated_list(body, "payloads", limit);

        let summary = if status == QUERY_OK {
            format!("Retrieved {} recent malware payloads from URLhaus", total)
        } else {
            format!("No recent payloads available (query status: {})", status)
        };

        list_envelope(status, summary, "payloads", payloads, total)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetPayloadsParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<GetPayloadsParams>(),
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
                let params: GetPayloadsParams =
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
    use rmcp::model::RawContent;
    use serde_json::json;

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_params_zero_limit_falls_back_to_default() {
        let params: GetPayloadsParams = serde_json::from_value(json!({"limit": 0})).unwrap();
        assert_eq!(effective_limit(params.limit), 100);
    }

    #[test]
    fn test_shape_result_uses_payloads_key() {
        let body = json!({
            "query_status": "ok",
            "payloads": [{"md5_hash": "a"}, {"md5_hash": "b"}],
        });
        let result = GetPayloadsTool::shape_result(&body, 100);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(parsed["payloads"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["payloads_count"], 2);
        assert!(
            parsed["summary"]
                .as_str()
                .unwrap()
                .contains("2 recent malware payloads")
        );
    }

    #[test]
    fn test_shape_result_no_results() {
        let body = json!({"query_status": "no_results"});
        let result = GetPayloadsTool::shape_result(&body, 100);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(parsed["payloads_count"], 0);
        assert!(parsed["summary"].as_str().unwrap().contains("no_results"));
    }
}
