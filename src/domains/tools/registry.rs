//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::definitions::{
    GetPayloadsTool, GetRecentUrlsTool, GetUrlsBySignatureTool, GetUrlsByTagTool, LookupHostTool,
    LookupPayloadTool, LookupUrlTool,
};
use super::definitions::urlhaus::UrlhausClient;

#[cfg(feature = "http")]
use super::error::ToolError;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
///
/// The registry holds the shared [`UrlhausClient`], constructed once at
/// startup and reused by every dispatched call.
pub struct ToolRegistry {
    client: Arc<UrlhausClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<UrlhausClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GetRecentUrlsTool::NAME,
            LookupUrlTool::NAME,
            LookupHostTool::NAME,
            LookupPayloadTool::NAME,
            GetUrlsByTagTool::NAME,
            GetUrlsBySignatureTool::NAME,
            GetPayloadsTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GetRecentUrlsTool::to_tool(),
            LookupUrlTool::to_tool(),
            LookupHostTool::to_tool(),
            LookupPayloadTool::to_tool(),
            GetUrlsByTagTool::to_tool(),
            GetUrlsBySignatureTool::to_tool(),
            GetPayloadsTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let client = self.client.clone();

        match name {
            GetRecentUrlsTool::NAME => GetRecentUrlsTool::http_handler(arguments, client).await,
            LookupUrlTool::NAME => LookupUrlTool::http_handler(arguments, client).await,
            LookupHostTool::NAME => LookupHostTool::http_handler(arguments, client).await,
            LookupPayloadTool::NAME => LookupPayloadTool::http_handler(arguments, client).await,
            GetUrlsByTagTool::NAME => GetUrlsByTagTool::http_handler(arguments, client).await,
            GetUrlsBySignatureTool::NAME => {
                GetUrlsBySignatureTool::http_handler(arguments, client).await
            }
            GetPayloadsTool::NAME => GetPayloadsTool::http_handler(arguments, client).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UpstreamConfig;

    fn test_registry() -> ToolRegistry {
        let client = Arc::new(UrlhausClient::new(&UpstreamConfig::default()).unwrap());
        ToolRegistry::new(client)
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = test_registry();
        let names = registry.tool_names();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"get_recent_urls"));
        assert!(names.contains(&"lookup_url"));
        assert!(names.contains(&"lookup_host"));
        assert!(names.contains(&"lookup_payload"));
        assert!(names.contains(&"get_urls_by_tag"));
        assert!(names.contains(&"get_urls_by_signature"));
        assert!(names.contains(&"get_payloads"));
    }

    #[test]
    fn test_get_all_tools_matches_names() {
        let registry = test_registry();
        let names = registry.tool_names();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), names.len());
        for tool in &tools {
            assert!(names.contains(&tool.name.as_ref()));
            assert!(tool.description.is_some());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = test_registry();
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_bad_arguments() {
        // Missing required 'url' fails at deserialization, before any request.
        let registry = test_registry();
        let result = registry.call_tool("lookup_url", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
