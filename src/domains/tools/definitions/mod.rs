//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod urlhaus;

pub use urlhaus::{
    GetPayloadsParams, GetPayloadsTool, GetRecentUrlsParams, GetRecentUrlsTool,
    GetUrlsBySignatureParams, GetUrlsBySignatureTool, GetUrlsByTagParams, GetUrlsByTagTool,
    LookupHostParams, LookupHostTool, LookupPayloadParams, LookupPayloadTool, LookupUrlParams,
    LookupUrlTool,
};
