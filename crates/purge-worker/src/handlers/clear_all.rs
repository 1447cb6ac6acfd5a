//! clear_all operation handler.
//!
//! Empties the whole cache root and reports purge counters.

use purge_protocol::ops::InvalidationResponse;
use purge_protocol::{RpcError, RpcRequest};

use super::{clear_all_message, to_payload};
use crate::cache::InvalidationResult;
use crate::surface::ControlSurface;

/// Handle the clear_all operation.
pub fn handle(_request: &RpcRequest, surface: &ControlSurface) -> Result<serde_json::Value, RpcError> {
    let stats = surface.clear_all_with_stats();
    let result = stats
        .as_ref()
        .map_or(InvalidationResult::NotFound, |s| s.result());

    let mut response = InvalidationResponse::new(result.status(), clear_all_message(result));
    response.summary = stats.map(|s| s.summary());

    to_payload(response)
}
