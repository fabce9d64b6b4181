//! Tool-specific error types.

use rmcp::model::ErrorCode;
use thiserror::Error;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Map a protocol fault onto the tool error taxonomy.
    ///
    /// Used by the HTTP dispatch path, where tool handlers surface
    /// protocol-level faults as `rmcp::ErrorData`.
    pub fn from_mcp(err: rmcp::ErrorData) -> Self {
        if err.code == ErrorCode::INVALID_PARAMS {
            Self::InvalidArguments(err.message.to_string())
        } else {
            Self::ExecutionFailed(err.message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::ErrorData as McpError;

    #[test]
    fn test_from_mcp_invalid_params() {
        let err = ToolError::from_mcp(McpError::invalid_params("missing 'url'", None));
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("missing 'url'"));
    }

    #[test]
    fn test_from_mcp_internal() {
        let err = ToolError::from_mcp(McpError::internal_error("connection reset", None));
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }
}
