//! Host lookup tool.
//!
//! Looks up a host record via `POST /host/`. The upstream reply embeds the
//! list of malicious URLs observed on the host.

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

/// Parameters for the host lookup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LookupHostParams {
    /// The host to look up.
    #[schemars(description = "The host to look up: a domain name, IPv4 or IPv6 address")]
    pub host: String,
}

/// Host lookup tool - retrieves the URLhaus record for a host.
pub struct LookupHostTool;

impl LookupHostTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lookup_host";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Look up a host (domain name, IPv4 or IPv6 address) in the URLhaus database. Returns host information together with the malicious URLs observed on that host.";

    #[instrument(skip_all, fields(host = %params.host))]
    pub async fn execute(
        params: &LookupHostParams,
        client: &UrlhausClient,
    ) -> Result<CallToolResult, McpError> {
        let host = required_field(&params.host, "host")?;
        info!("Looking up host");

        let body = match client.lookup_host(&host).await {
            Ok(body) => body,
            Err(e) => return upstream_failure(e),
        };

        Ok(Self::shape_result(body, &host))
    }

    fn shape_result(body: Value, host: &str) -> CallToolResult {
        let status = query_status(&body).to_string();
        let url_count = body
            .get("urls")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let summary = if status == QUERY_OK {
            format!(
                "Host found in URLhaus: {} ({} associated URL(s))",
                host, url_count
            )
        } else {
            format!("Host not found in URLhaus (query status: {})", status)
        };

        record_envelope(&status, summary, body)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<UrlhausClient>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: LookupHostParams = serde_json::from_value(arguments)
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
            input_schema: cached_schema_for_type::<LookupHostParams>(),
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
                let params: LookupHostParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Self::execute(&params, &client).await
            }
            .boxed()
        })
    }
}
