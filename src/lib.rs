//! URLhaus MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes
//! the URLhaus threat-intelligence API as a set of callable tools.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling, and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: MCP tools that query the URLhaus REST API
//!
//! # Example
//!
//! ```rust,no_run
//! use urlhaus_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use self::core::{Config, Error, McpServer, Result};
