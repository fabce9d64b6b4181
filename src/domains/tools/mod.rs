//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Every tool in this server queries the URLhaus REST API and wraps the
//! reply in a normalized JSON envelope.
//!
//! ## Architecture
//!
//! - `definitions/urlhaus/` - Individual tool implementations (one file per tool)
//!   plus the shared API client and envelope helpers
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/urlhaus/` (e.g., `my_lookup.rs`)
//! 2. Define params, execute(), and http_handler()
//! 3. Export in `definitions/urlhaus/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` for HTTP support

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
