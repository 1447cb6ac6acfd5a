//! clear_one operation handler.
//!
//! Removes the cache file for a single URL.

use purge_protocol::ops::{ClearOneRequest, InvalidationResponse};
use purge_protocol::{RpcError, RpcRequest};

use super::{clear_one_message, to_payload};
use crate::surface::ControlSurface;

/// Handle the clear_one operation.
pub fn handle(request: &RpcRequest, surface: &ControlSurface) -> Result<serde_json::Value, RpcError> {
    let req: ClearOneRequest = serde_json::from_value(request.payload.clone())
        .map_err(|e| RpcError::invalid_request(format!("invalid clear_one request: {}", e)))?;

    let result = surface.on_request_clear_one(&req.url);

    let mut response = InvalidationResponse::new(result.status(), clear_one_message(result));
    response.path = surface
        .entries()
        .locate(&req.url)
        .map(|p| p.display().to_string());

    to_payload(response)
}
