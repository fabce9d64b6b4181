//! Payload lookup tool.
//!
//! Looks up a malware payload record by hash via `POST /payload/`.

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
    QUERY_OK, is_md5_or_sha256, query_status, record_envelope, required_field, upstream_failure,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the payload lookup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LookupPayloadParams {
    /// The payload hash to look up.
    #[schemars(description = "MD5 or SHA-256 hash of the payload to look up")]
    pub hash: String,
}

/// Payload lookup tool - retrieves the URLhaus record for a malware sample.
pub struct LookupPayloadTool;

impl LookupPayloadTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lookup_payload";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up a malware payload by MD5 or SHA-256 hash in the URLhaus database. Returns the payload record including file type, size, signature, and the URLs distributing it.";

    #[instrument(skip_all, fields(hash = %params.hash))]
    pub async fn execute(
        params: &LookupPayloadParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let hash = required_field(&params.hash, "hash")?;
        if !is_md5_or_sha256(&hash) {
            return Err(McpError::invalid_params(
                format!("Parameter 'hash' must be an MD5 or SHA-256 hex digest, got '{hash}'"),
                None,
            ));
        }
        info!("Looking up payload");

        let body = match client.lookup_payload(&hash).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(body, &hash))
    }

    fn shape_result(body: Value, hash: &str) -> CallToolResult {
        let status = query_status(&body).to_string();

        let summary = if status == QUERY_OK {
            format!("Payload found in URLhaus: {}", hash)
        } else {
            format!("Payload not found in URLhaus (query status: {})", status)
        };

        record_envelope(&status, summary, body)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: LookupPayloadParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<LookupPayloadParams>(),
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
                let params: LookupPayloadParams =
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

    const MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn test_client() -> UrlhausClient {
        UrlhausClient::new(&UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_hash_is_invalid_params_fault() {
        let params = LookupPayloadParams {
            hash: "".to_string(),
        };
        let err =
            tokio_test::block_on(LookupPayloadTool::execute(&params, &test_client())).unwrap_err();
        assert!(err.message.contains("hash"));
    }

    #[test]
    fn test_malformed_hash_is_invalid_params_fault() {
        let params = LookupPayloadParams {
            hash: "not-a-hash".to_string(),
        };
        let err =
            tokio_test::block_on(LookupPayloadTool::execute(&params, &test_client())).unwrap_err();
        assert!(err.message.contains("MD5 or SHA-256"));
    }

    #[test]
    fn test_shape_result_found() {
        let body = json!({
            "query_status": "ok",
            "md5_hash": MD5,
            "file_type": "exe",
        });
        let result = LookupPayloadTool::shape_result(body.clone(), MD5);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert_eq!(
            parsed["summary"],
            format!("Payload found in URLhaus: {}", MD5)
        );
        assert_eq!(parsed["data"], body);
    }

    #[test]
    fn test_shape_result_not_found() {
        let body = json!({"query_status": "no_results"});
        let result = LookupPayloadTool::shape_result(body, MD5);

        let parsed: Value = serde_json::from_str(result_text(&result)).unwrap();
        assert!(parsed["summary"].as_str().unwrap().contains("not found"));
    }
}
