//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own
//! route; the shared [`UrlhausClient`] is injected into every route at build
//! time.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::urlhaus::UrlhausClient;
use super::definitions::{
    GetPayloadsTool, GetRecentUrlsTool, GetUrlsBySignatureTool, GetUrlsByTagTool, LookupHostTool,
    LookupPayloadTool, LookupUrlTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<UrlhausClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetRecentUrlsTool::create_route(client.clone()))
        .with_route(LookupUrlTool::create_route(client.clone()))
        .with_route(LookupHostTool::create_route(client.clone()))
        .with_route(LookupPayloadTool::create_route(client.clone()))
        .with_route(GetUrlsByTagTool::create_route(client.clone()))
        .with_route(GetUrlsBySignatureTool::create_route(client.clone()))
        .with_route(GetPayloadsTool::create_route(client))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::config::UpstreamConfig;

    struct TestServer {}

    fn test_client() -> Arc<UrlhausClient> {
        Arc::new(UrlhausClient::new(&UpstreamConfig::default()).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        let tools = router.list_all();
        assert_eq!(tools.len(), 7);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"get_recent_urls"));
        assert!(names.contains(&"lookup_url"));
        assert!(names.contains(&"lookup_host"));
        assert!(names.contains(&"lookup_payload"));
        assert!(names.contains(&"get_urls_by_tag"));
        assert!(names.contains(&"get_urls_by_signature"));
        assert!(names.contains(&"get_payloads"));
    }

    #[test]
    fn test_listing_is_stable() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        let first: Vec<_> = router.list_all().iter().map(|t| t.name.clone()).collect();
        let second: Vec<_> = router.list_all().iter().map(|t| t.name.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let client = test_client();
        let registry = ToolRegistry::new(client.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(client);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
