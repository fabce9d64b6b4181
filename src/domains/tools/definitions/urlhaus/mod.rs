//! URLhaus tool definitions.
//!
//! One file per tool, plus the shared API client (`client.rs`) and the
//! envelope/normalization helpers (`common.rs`). All seven tools follow the
//! same linear flow: normalize arguments, issue one HTTP request through the
//! shared [`UrlhausClient`], wrap the decoded body in a normalized envelope.

pub mod client;
pub mod common;

mod host;
mod payload;
mod recent_payloads;
mod recent_urls;
mod signature;
mod tag;
mod url;

pub use client::{UpstreamError, UrlhausClient};
pub use host::{LookupHostParams, LookupHostTool};
pub use payload::{LookupPayloadParams, LookupPayloadTool};
pub use recent_payloads::{GetPayloadsParams, GetPayloadsTool};
pub use recent_urls::{GetRecentUrlsParams, GetRecentUrlsTool};
pub use signature::{GetUrlsBySignatureParams, GetUrlsBySignatureTool};
pub use tag::{GetUrlsByTagParams, GetUrlsByTagTool};
pub use url::{LookupUrlParams, LookupUrlTool};
