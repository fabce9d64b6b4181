//! Common utilities shared across URLhaus tools.
//!
//! This module provides shared functionality: argument normalization, the
//! lenient `limit` policy, hash format checks, envelope construction, and
//! the mapping from upstream failures to tool results.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::warn;

/// Limit applied when the caller supplies none, zero, or garbage.
pub const DEFAULT_LIMIT: u64 = 100;

/// Hard cap on any requested limit. Larger values are silently capped.
pub const MAX_LIMIT: u64 = 1000;

/// Query status the upstream reports for a successful lookup.
pub const QUERY_OK: &str = "ok";

// ============================================================================
// Argument Normalization
// ============================================================================

/// Trim a required string parameter, failing with an invalid-params fault
/// when nothing remains.
pub fn required_field(value: &str, name: &str) -> Result<String, McpError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(McpError::invalid_params(
            format!("Missing required parameter '{name}'"),
            None,
        ));
    }
    Ok(trimmed.to_string())
}

/// Lenient deserializer for `limit` fields.
///
/// Accepts integers, floats, and numeric strings. Anything else (including
/// absent values) deserializes to `None` rather than failing the call.
pub fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_limit))
}

fn parse_limit(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve a parsed `limit` to the value actually sent upstream.
///
/// Absent, unparseable, and zero all fall back to [`DEFAULT_LIMIT`];
/// anything above [`MAX_LIMIT`] is capped, not rejected.
pub fn effective_limit(raw: Option<u64>) -> u64 {
    match raw {
        None | Some(0) => DEFAULT_LIMIT,
        Some(n) => n.min(MAX_LIMIT),
    }
}

/// Check whether a string looks like an MD5 (32 hex) or SHA-256 (64 hex)
/// digest.
pub fn is_md5_or_sha256(hash: &str) -> bool {
    matches!(hash.len(), 32 | 64) && hash.chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Response Shaping
// ============================================================================

/// Read the upstream `query_status` field, defensively.
pub fn query_status(body: &Value) -> &str {
    body.get("query_status")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

/// Pull a collection out of the upstream body, truncated to `limit`.
///
/// Returns the truncated items together with the upstream's pre-truncation
/// length. Truncation is idempotent: bodies already within the limit pass
/// through unchanged.
pub fn truncated_list(body: &Value, key: &str, limit: u64) -> (Vec<Value>, usize) {
    let items = body
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let total = items.len();
    let truncated: Vec<Value> = items.into_iter().take(limit as usize).collect();
    (truncated, total)
}

/// Build a success result for a single-record lookup.
///
/// The envelope carries the upstream body verbatim under `data`.
pub fn record_envelope(status: &str, summary: String, body: Value) -> CallToolResult {
    envelope(json!({
        "query_status": status,
        "summary": summary,
        "data": body,
    }))
}

/// Build a success result for a list-bearing lookup.
///
/// `items` is the (already truncated) collection; `total` is the upstream's
/// reported length, surfaced as `<key>_count`.
pub fn list_envelope(
    status: &str,
    summary: String,
    key: &str,
    items: Vec<Value>,
    total: usize,
) -> CallToolResult {
    let mut body = serde_json::Map::new();
    body.insert("query_status".to_string(), json!(status));
    body.insert("summary".to_string(), json!(summary));
    body.insert(key.to_string(), Value::Array(items));
    body.insert(format!("{key}_count"), json!(total));
    envelope(Value::Object(body))
}

fn envelope(body: Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(&body)
        .unwrap_or_else(|_| body.to_string());
    CallToolResult::success(vec![Content::text(text)])
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Map an upstream failure onto the tool-result error taxonomy.
///
/// Rate limiting and HTTP failures become error-flagged text results the
/// caller can relay without the session faulting; transport failures
/// propagate as protocol-level faults.
pub fn upstream_failure(
    err: super::client::UpstreamError,
) -> Result<CallToolResult, McpError> {
    use super::client::UpstreamError;

    match err {
        UpstreamError::RateLimited => Ok(error_result(
            "URLhaus rate limit exceeded (HTTP 429). Wait before retrying.",
        )),
        UpstreamError::Status { code, query_status } => {
            let detail = query_status.unwrap_or_else(|| "upstream request failed".to_string());
            Ok(error_result(&format!(
                "URLhaus request failed with HTTP {code}: {detail}"
            )))
        }
        UpstreamError::Transport(e) => Err(McpError::internal_error(
            format!("URLhaus request failed: {e}"),
            None,
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
