//! URL lookup tool.
//!
//! Looks up a single URL record via `POST /url/`.

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
use super::common::{QUERY_OK, query_status, record_envelope, required_field, upstream_failure};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the URL lookup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LookupUrlParams {
    /// The URL to look up.
    #[schemars(description = "The URL to look up (e.g. 'http://example.com/bad.exe')")]
    pub url: String,
}

/// URL lookup tool - retrieves the URLhaus record for a single URL.
pub struct LookupUrlTool;

impl LookupUrlTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lookup_url";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up a URL in the URLhaus database. Returns the full URL record including threat type, online/offline status, tags, and associated payloads when the URL is known.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(url = %params.url))]
    pub async fn execute(
        params: &LookupUrlParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let url = required_field(&params.url, "url")?;
        info!("Looking up URL");

        let body = match client.lookup_url(&url).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(body, &url))
    }

    /// Wrap the upstream record in the lookup envelope.
    fn shape_result(body: Value, url: &str) -> CallToolResult {
        let status = query_status(&body).to_string();

        let summary = if status == QUERY_OK {
            format!("URL found in URLhaus: {}", url)
        } else {
            format!("URL not found in URLhaus (query status: {})", status)
        };

        record_envelope(&status, summary, body)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: LookupUrlParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<LookupUrlParams>(),
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
                let params: LookupUrlParams =
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
    fn test_params_require_url() {
        let result: Result<LookupUrlParams, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_url_is_invalid_params_fault() {
        let client = UrlhausClient::new(&UpstreamConfig::default()).unwrap();
        let params = LookupUrlParams {
            url: "   ".to_string(),
        };

        // Fails during normalization, before any HTTP request is issued.
        let err = tokio_test::block_on(LookupUrlTool::execute(&params, &client)).unwrap_err();
        assert!(err.message.contains("url"));
    }

    #[test]
    fn test_shape_result_found() {
        let body = json!({
            "query_status": "ok",
            "url": "http://example.com/bad.exe",
            "threat": "malware_download",
        });
        let result = LookupUrlTool::shape_result(body.clone(), "http://example.com/bad.exe");
        assert!(!result.is_error.unwrap_or(false));

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(
            parsed["summary"],
            "URL found in URLhaus: http://example.com/bad.exe"
        );
        assert_eq!(parsed["data"], body);
    }

    #[test]
    fn test_shape_result_not_found() {
        let body = json!({"query_status": "no_results"});
        let result = LookupUrlTool::shape_result(body, "http://example.com/");

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(
            parsed["summary"],
            "URL not found in URLhaus (query status: no_results)"
        );
    }

    // Integration test (requires network, run with: cargo test -- --ignored)
    #[ignore]
    #[tokio::test]
    async fn test_lookup_url_live() {
        let client = UrlhausClient::new(&UpstreamConfig::default()).unwrap();
        let params = LookupUrlParams {
            url: "http://example.com/".to_string(),
        };
        let result = LookupUrlTool::execute(&params, &client).await.unwrap();
        let text = result_text(&result);
        assert!(text.contains("query_status"));
    }
}
