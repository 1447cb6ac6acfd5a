//! Operation handlers for the worker RPC.
//!
//! Each operation has its own handler module that runs the matching control
//! surface entry point and renders an [`InvalidationResponse`].

pub mod clear_all;
pub mod clear_object;
pub mod clear_one;

use purge_protocol::ops::InvalidationResponse;
use purge_protocol::RpcError;

use crate::cache::InvalidationResult;

/// Admin-facing message for a `clear_one` outcome.
pub fn clear_one_message(result: InvalidationResult) -> &'static str {
    match result {
        InvalidationResult::Success => "Cache cleared successfully.",
        InvalidationResult::NotFound => "Cache file does not exist.",
        InvalidationResult::InvalidInput => "Invalid URL entered",
        InvalidationResult::Disabled => "Page cache is not enabled.",
        InvalidationResult::PartialFailure | InvalidationResult::IoFailure => "Failed to clear cache.",
    }
}

/// Admin-facing message for a `clear_all` outcome.
pub fn clear_all_message(result: InvalidationResult) -> &'static str {
    match result {
        InvalidationResult::Success => "All cache cleared successfully.",
        InvalidationResult::NotFound => "Cache directory does not exist.",
        InvalidationResult::Disabled => "Page cache is not enabled.",
        InvalidationResult::PartialFailure
        | InvalidationResult::IoFailure
        | InvalidationResult::InvalidInput => "Failed to clear all cache.",
    }
}

/// Admin-facing message for a `clear_object` outcome.
pub fn clear_object_message(result: InvalidationResult) -> &'static str {
    match result {
        InvalidationResult::Success => "Object cache cleared successfully.",
        InvalidationResult::Disabled => "Object cache is not enabled.",
        _ => "Failed to clear object cache.",
    }
}

fn to_payload(response: InvalidationResponse) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(response).map_err(|e| {
        RpcError::invalid_request(format!("failed to serialize response: {}", e))
    })
}
