//! Signature search tool.
//!
//! Searches malicious URLs by malware signature via `POST /signature/`.

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

/// Parameters for the signature search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetUrlsBySignatureParams {
    /// The malware signature to search for.
    #[schemars(description = "Malware signature to search for (e.g. 'CobaltStrike')")]
    pub signature: String,

    /// Maximum number of URLs to return (default: 100, max: 1000).
    #[schemars(description = "Maximum number of URLs to return (default: 100, max: 1000)")]
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<u64>,
}

/// Signature search tool - lists malicious URLs associated with a signature.
pub struct GetUrlsBySignatureTool;

impl GetUrlsBySignatureTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_urls_by_signature";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search URLhaus for malicious URLs associated with a malware signature (e.g. 'CobaltStrike'). Returns up to 'limit' matching URL records (default: 100, max: 1000).";

    #[instrument(skip_all, fields(signature = %params.signature))]
    pub async fn execute(
        params: &GetUrlsBySignatureParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let signature = required_field(&params.signature, "signature")?;
        let limit = effective_limit(params.limit);
        info!("Searching URLs by signature (limit={})", limit);

        let body = match client.urls_by_signature(&signature, limit).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(&body, &signature, limit))
    }

    fn shape_result(body: &Value, signature: &str, limit: u64) -> CallToolResult {
        let status = query_status(body);
        let (urls, total) = truncated_list(body, "urls", limit);

        let summary = if status == QUERY_OK {
            format!("Found {} URL(s) for signature '{}'", total, signature)
        } else {
            format!(
                "No URLs found for signature '{}' (query status: {})",
                signature, status
            )
        };

        list_envelope(status, summary, "urls", urls, total)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetUrlsBySignatureParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<GetUrlsBySignatureParams>(),
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
                let params: GetUrlsBySignatureParams =
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
    fn test_params_limit_coercion() {
        let params: GetUrlsBySignatureParams =
            serde_json::from_value(json!({"signature": "CobaltStrike", "limit": 5000})).unwrap();
        assert_eq!(effective_limit(params.limit), 1000);
    }

    #[test]
    fn test_empty_signature_is_invalid_params_fault() {
        let client = UrlhausClient::new(&UpstreamConfig::default()).unwrap();
        let params = GetUrlsBySignatureParams {
            signature: "".to_string(),
            limit: None,
        };

        let err =
            tokio_test::block_on(GetUrlsBySignatureTool::execute(&params, &client)).unwrap_err();
        assert!(err.message.contains("signature"));
    }

    #[test]
    fn test_shape_result_truncates_to_limit() {
        let body = json!({
            "query_status": "ok",
            "urls": [{"id": "1"}, {"id": "2"}, {"id": "3"}],
        });
        let result = GetUrlsBySignatureTool::shape_result(&body, "CobaltStrike", 1);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(parsed["urls"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["urls_count"], 3);
        assert_eq!(parsed["summary"], "Found 3 URL(s) for signature 'CobaltStrike'");
    }
}
